//! Partitioning parameters.
//!
//! Contains the configuration handed to the layout engine with every request.

use std::fmt;

/// Extraction strategy requested from the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Model-based layout detection. Required for image and table blocks.
    #[default]
    HiRes,
    /// Text-layer extraction without layout detection.
    Fast,
    /// OCR over rendered pages.
    OcrOnly,
    /// Let the engine decide per document.
    Auto,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HiRes => "hi_res",
            Self::Fast => "fast",
            Self::OcrOnly => "ocr_only",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the engine groups elements into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkingStrategy {
    /// Start a new chunk at each title, respecting `max_characters`.
    #[default]
    ByTitle,
    /// Fill chunks up to `max_characters` regardless of section boundaries.
    Basic,
}

impl ChunkingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByTitle => "by_title",
            Self::Basic => "basic",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block types whose raster the engine should extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Image,
    Table,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Table => "Table",
        }
    }
}

/// Parameters for a partitioning request.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionParams {
    /// Ask the engine to infer table structure.
    pub infer_table_structure: bool,

    /// Extraction strategy.
    pub strategy: Strategy,

    /// Block types extracted as raster images.
    pub extract_image_block_types: Vec<BlockType>,

    /// Embed extracted rasters as base64 payloads instead of writing files.
    pub extract_image_block_to_payload: bool,

    /// Chunking strategy.
    pub chunking_strategy: ChunkingStrategy,

    /// Hard upper bound on characters per chunk.
    pub max_characters: usize,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            infer_table_structure: true,
            strategy: Strategy::HiRes,
            extract_image_block_types: vec![BlockType::Image, BlockType::Table],
            extract_image_block_to_payload: true,
            chunking_strategy: ChunkingStrategy::ByTitle,
            max_characters: 1000,
        }
    }
}

impl PartitionParams {
    /// Renders the parameters as command-line flags for an external
    /// partitioner process.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--strategy".to_string(),
            self.strategy.to_string(),
            "--chunking-strategy".to_string(),
            self.chunking_strategy.to_string(),
            "--max-characters".to_string(),
            self.max_characters.to_string(),
        ];
        if self.infer_table_structure {
            args.push("--infer-table-structure".to_string());
        }
        if !self.extract_image_block_types.is_empty() {
            let types: Vec<&str> = self
                .extract_image_block_types
                .iter()
                .map(|t| t.as_str())
                .collect();
            args.push("--extract-image-block-types".to_string());
            args.push(types.join(","));
        }
        if self.extract_image_block_to_payload {
            args.push("--extract-image-block-to-payload".to_string());
        }
        args
    }
}
