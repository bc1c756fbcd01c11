//! chunkwise - Re-aggregates classified document-layout elements into
//! page-anchored text, image, and table records for indexing.

pub mod aggregator;
pub mod api;
pub mod element;
pub mod engine;
pub mod error;
pub mod record;
pub mod unstructured;
pub mod utils;

// Re-export high_level at the crate root
pub use api::high_level;

pub use aggregator::{LayoutAggregator, aggregate};
pub use element::{Chunk, Element, ElementContent, ElementKind};
pub use error::{ChunkError, Result};
pub use record::{PageBox, Record, RecordType};
pub use utils::merge_bounding_boxes;
