//! High-level processing API.
//!
//! Provides the caller-facing operations:
//! - `process_document()` - partition a document stream and aggregate it
//! - `process_bytes()` - same, for an in-memory document
//! - `process_batch()` - many documents in parallel, one aggregator each

use std::io::{Read, Seek, SeekFrom};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::aggregator::aggregate;
use crate::engine::{LayoutEngine, PartitionParams};
use crate::error::{ChunkError, Result};
use crate::record::Record;

/// Options for document processing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessOptions {
    /// Parameters sent to the layout engine.
    pub params: PartitionParams,

    /// Worker threads for `process_batch`. None uses available parallelism.
    pub threads: Option<usize>,
}

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn require_resource_id(resource_id: Option<&str>) -> Result<&str> {
    match resource_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ChunkError::MissingInput("resource_id")),
    }
}

/// Partition a document stream with `engine` and aggregate it into records.
///
/// The stream is rewound to its start before it is read. A missing or empty
/// `resource_id`, or a missing `document`, is rejected with
/// [`ChunkError::MissingInput`] before the engine is called.
///
/// # Example
/// ```ignore
/// use chunkwise_core::api::process_document;
/// use chunkwise_core::engine::CommandEngine;
///
/// let engine = CommandEngine::new("partition-pdf");
/// let file = std::fs::File::open("report.pdf")?;
/// let records = process_document(&engine, Some("report"), Some(file), None)?;
/// ```
pub fn process_document<E, R>(
    engine: &E,
    resource_id: Option<&str>,
    document: Option<R>,
    options: Option<ProcessOptions>,
) -> Result<Vec<Record>>
where
    E: LayoutEngine + ?Sized,
    R: Read + Seek,
{
    let resource_id = require_resource_id(resource_id)?;
    let mut document = document.ok_or(ChunkError::MissingInput("file"))?;

    document.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    document.read_to_end(&mut bytes)?;

    process_bytes(engine, resource_id, &bytes, options)
}

/// Partition an in-memory document and aggregate it into records.
pub fn process_bytes<E>(
    engine: &E,
    resource_id: &str,
    document: &[u8],
    options: Option<ProcessOptions>,
) -> Result<Vec<Record>>
where
    E: LayoutEngine + ?Sized,
{
    let resource_id = require_resource_id(Some(resource_id))?;
    let options = options.unwrap_or_default();

    info!(resource_id, bytes = document.len(), "partitioning document");
    let chunks = engine.partition(document, &options.params)?;
    debug!(resource_id, chunks = chunks.len(), "partitioning done");

    aggregate(&chunks, resource_id)
}

/// Process many `(resource_id, document)` pairs in parallel.
///
/// Results come back in input order. Every document gets its own aggregator,
/// so one failing document does not affect the others.
pub fn process_batch<E>(
    engine: &E,
    documents: &[(String, Vec<u8>)],
    options: Option<ProcessOptions>,
) -> Result<Vec<Result<Vec<Record>>>>
where
    E: LayoutEngine + ?Sized,
{
    let options = options.unwrap_or_default();
    let thread_count = options.threads.unwrap_or_else(default_thread_count).max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|e| ChunkError::Runtime(e.to_string()))?;

    Ok(pool.install(|| {
        documents
            .par_iter()
            .map(|(resource_id, bytes)| {
                process_bytes(engine, resource_id, bytes, Some(options.clone()))
            })
            .collect()
    }))
}
