//! Layout engine boundary.
//!
//! The layout engine classifies raw document content into typed elements and
//! groups them into chunks. It is an external collaborator; this module only
//! defines the request/response seam and a couple of adapters:
//!
//! - [`JsonEngine`] treats the document bytes as already-partitioned engine
//!   output (element JSON).
//! - [`CommandEngine`] pipes the document through an external partitioner
//!   process and parses its JSON output.

pub mod command;
pub mod json;
pub mod params;

pub use command::CommandEngine;
pub use json::JsonEngine;
pub use params::{BlockType, ChunkingStrategy, PartitionParams, Strategy};

use crate::element::Chunk;
use crate::error::Result;

/// A layout engine that partitions a document into chunks of elements.
///
/// Implementations report every failure as
/// [`ChunkError::UpstreamParsing`](crate::error::ChunkError::UpstreamParsing)
/// with the underlying message preserved.
pub trait LayoutEngine: Send + Sync {
    /// Partition `document` according to `params`.
    fn partition(&self, document: &[u8], params: &PartitionParams) -> Result<Vec<Chunk>>;
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for &E {
    fn partition(&self, document: &[u8], params: &PartitionParams) -> Result<Vec<Chunk>> {
        (**self).partition(document, params)
    }
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for Box<E> {
    fn partition(&self, document: &[u8], params: &PartitionParams) -> Result<Vec<Chunk>> {
        (**self).partition(document, params)
    }
}
