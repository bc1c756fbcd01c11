//! Error types for chunkwise layout aggregation.

use thiserror::Error;

/// Primary error type for partitioning and aggregation.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("layout engine failed: {0}")]
    UpstreamParsing(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl ChunkError {
    /// True for errors caused by the caller omitting a required parameter.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput(_))
    }
}

/// Convenience Result type alias for ChunkError.
pub type Result<T> = std::result::Result<T, ChunkError>;
