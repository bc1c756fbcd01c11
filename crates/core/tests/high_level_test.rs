//! Tests for the high-level processing API:
//! - process_document() - input validation, stream rewinding, error propagation
//! - process_bytes() - engine parameters
//! - process_batch() - isolated per-document aggregation

use std::io::{Cursor, Seek, SeekFrom};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chunkwise_core::api::{ProcessOptions, process_batch, process_bytes, process_document};
use chunkwise_core::element::{Chunk, Element};
use chunkwise_core::engine::{JsonEngine, LayoutEngine, PartitionParams, Strategy};
use chunkwise_core::error::{ChunkError, Result};
use chunkwise_core::record::RecordType;
use serde_json::json;

/// Engine returning fixed chunks and recording what it was asked.
#[derive(Default)]
struct StubEngine {
    chunks: Vec<Chunk>,
    calls: AtomicUsize,
    seen_params: Mutex<Vec<PartitionParams>>,
    seen_bytes: Mutex<Vec<Vec<u8>>>,
}

impl StubEngine {
    fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks,
            ..Self::default()
        }
    }
}

impl LayoutEngine for StubEngine {
    fn partition(&self, document: &[u8], params: &PartitionParams) -> Result<Vec<Chunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_params.lock().unwrap().push(params.clone());
        self.seen_bytes.lock().unwrap().push(document.to_vec());
        Ok(self.chunks.clone())
    }
}

/// Engine that fails on documents starting with "bad".
struct PickyEngine;

impl LayoutEngine for PickyEngine {
    fn partition(&self, document: &[u8], _params: &PartitionParams) -> Result<Vec<Chunk>> {
        if document.starts_with(b"bad") {
            return Err(ChunkError::UpstreamParsing("unsupported format".to_string()));
        }
        let text = String::from_utf8_lossy(document).into_owned();
        Ok(vec![Chunk::new(vec![Element::text(
            1,
            vec![(0.0, 0.0), (1.0, 1.0)],
            text,
        )])])
    }
}

fn sample_chunks() -> Vec<Chunk> {
    vec![Chunk::new(vec![
        Element::text(1, vec![(0.0, 0.0), (4.0, 1.0)], "hello"),
        Element::image(1, vec![(0.0, 2.0), (4.0, 6.0)], "QUJD", "image/png"),
    ])]
}

// ============================================================================
// Input validation
// ============================================================================

#[test]
fn test_missing_resource_id() {
    let engine = StubEngine::new(sample_chunks());
    let err = process_document(&engine, None, Some(Cursor::new(b"pdf".to_vec())), None)
        .unwrap_err();
    assert!(matches!(err, ChunkError::MissingInput("resource_id")));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_empty_resource_id() {
    let engine = StubEngine::new(sample_chunks());
    let err = process_document(&engine, Some(""), Some(Cursor::new(b"pdf".to_vec())), None)
        .unwrap_err();
    assert!(err.is_missing_input());
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_file() {
    let engine = StubEngine::new(sample_chunks());
    let err = process_document(&engine, Some("doc"), None::<Cursor<Vec<u8>>>, None).unwrap_err();
    assert!(matches!(err, ChunkError::MissingInput("file")));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// process_document / process_bytes
// ============================================================================

#[test]
fn test_stream_rewound_before_read() {
    let engine = StubEngine::new(sample_chunks());
    let mut stream = Cursor::new(b"%PDF-1.7 body".to_vec());
    stream.seek(SeekFrom::End(0)).unwrap();

    let records = process_document(&engine, Some("doc"), Some(stream), None).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        engine.seen_bytes.lock().unwrap().as_slice(),
        &[b"%PDF-1.7 body".to_vec()]
    );
}

#[test]
fn test_default_params_sent_to_engine() {
    let engine = StubEngine::new(Vec::new());
    process_bytes(&engine, "doc", b"x", None).unwrap();
    let seen = engine.seen_params.lock().unwrap();
    assert_eq!(seen.as_slice(), &[PartitionParams::default()]);
    assert!(seen[0].infer_table_structure);
    assert_eq!(seen[0].strategy, Strategy::HiRes);
    assert_eq!(seen[0].max_characters, 1000);
}

#[test]
fn test_custom_params_sent_to_engine() {
    let engine = StubEngine::new(Vec::new());
    let options = ProcessOptions {
        params: PartitionParams {
            max_characters: 300,
            ..PartitionParams::default()
        },
        ..ProcessOptions::default()
    };
    process_bytes(&engine, "doc", b"x", Some(options)).unwrap();
    assert_eq!(engine.seen_params.lock().unwrap()[0].max_characters, 300);
}

#[test]
fn test_upstream_failure_propagates() {
    let err = process_bytes(&PickyEngine, "doc", b"bad bytes", None).unwrap_err();
    match err {
        ChunkError::UpstreamParsing(msg) => assert_eq!(msg, "unsupported format"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_json_engine_end_to_end() {
    let doc = json!([
        {
            "type": "CompositeElement",
            "text": "Hello world",
            "metadata": {
                "page_number": 1,
                "orig_elements": [
                    {
                        "type": "NarrativeText",
                        "text": "Hello",
                        "metadata": {"page_number": 1, "coordinates": {"points": [[0.0, 0.0], [5.0, 2.0]]}}
                    },
                    {
                        "type": "Image",
                        "text": "",
                        "metadata": {
                            "page_number": 1,
                            "coordinates": {"points": [[0.0, 3.0], [5.0, 9.0]]},
                            "image_base64": "QUJD",
                            "image_mime_type": "image/png"
                        }
                    },
                    {
                        "type": "NarrativeText",
                        "text": "world",
                        "metadata": {"page_number": 2, "coordinates": {"points": [[1.0, 1.0], [6.0, 4.0]]}}
                    }
                ]
            }
        }
    ]);
    let stream = Cursor::new(doc.to_string().into_bytes());

    let records = process_document(&JsonEngine::new(), Some("rid"), Some(stream), None).unwrap();
    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!([
            {
                "id": "rid_0",
                "content": "QUJD",
                "type": "image",
                "mime_type": "image/png",
                "bounding_box": [{"1": [[0.0, 3.0], [5.0, 9.0]]}]
            },
            {
                "id": "rid_1",
                "content": "Hello world",
                "type": "text",
                "bounding_box": [
                    {"1": [[0.0, 0.0], [0.0, 2.0], [5.0, 2.0], [5.0, 0.0]]},
                    {"2": [[1.0, 1.0], [1.0, 4.0], [6.0, 4.0], [6.0, 1.0]]}
                ]
            }
        ])
    );
}

#[test]
fn test_engine_as_trait_object() {
    let engine: Box<dyn LayoutEngine> = Box::new(StubEngine::new(sample_chunks()));
    let records = process_bytes(engine.as_ref(), "obj", b"x", None).unwrap();
    assert_eq!(records[0].record_type, RecordType::Image);
    assert_eq!(records[1].id, "obj_1");
}

// ============================================================================
// process_batch
// ============================================================================

#[test]
fn test_batch_keeps_order_and_isolates_failures() {
    let docs: Vec<(String, Vec<u8>)> = (0..16)
        .map(|i| {
            let body = if i % 5 == 3 {
                format!("bad {i}")
            } else {
                format!("doc {i}")
            };
            (format!("r{i}"), body.into_bytes())
        })
        .collect();

    let options = ProcessOptions {
        threads: Some(4),
        ..ProcessOptions::default()
    };
    let results = process_batch(&PickyEngine, &docs, Some(options)).unwrap();
    assert_eq!(results.len(), docs.len());

    for (i, result) in results.iter().enumerate() {
        if i % 5 == 3 {
            assert!(matches!(result, Err(ChunkError::UpstreamParsing(_))));
        } else {
            let records = result.as_ref().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].id, format!("r{i}_0"));
            assert_eq!(records[0].content, format!("doc {i}"));
        }
    }
}

#[test]
fn test_batch_rejects_empty_resource_id() {
    let docs = vec![(String::new(), b"doc".to_vec())];
    let results = process_batch(&PickyEngine, &docs, None).unwrap();
    assert!(matches!(results[0], Err(ChunkError::MissingInput(_))));
}
