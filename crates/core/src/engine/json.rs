//! Engine adapter over pre-partitioned element JSON.

use tracing::debug;

use super::LayoutEngine;
use super::params::PartitionParams;
use crate::element::Chunk;
use crate::error::Result;
use crate::unstructured::parse_chunks;

/// Reads the document bytes as element JSON produced earlier by the layout
/// engine. Partition parameters were applied when that JSON was produced and
/// are ignored here.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEngine;

impl JsonEngine {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutEngine for JsonEngine {
    fn partition(&self, document: &[u8], _params: &PartitionParams) -> Result<Vec<Chunk>> {
        debug!(bytes = document.len(), "parsing pre-partitioned element json");
        parse_chunks(document)
    }
}
