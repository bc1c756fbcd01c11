//! High-level API module.
//!
//! # Example
//!
//! ```ignore
//! use chunkwise_core::api::process_document;
//! use chunkwise_core::engine::JsonEngine;
//!
//! let file = std::fs::File::open("elements.json")?;
//! let records = process_document(&JsonEngine, Some("doc-42"), Some(file), None)?;
//! ```

pub mod high_level;

pub use high_level::{ProcessOptions, process_batch, process_bytes, process_document};
