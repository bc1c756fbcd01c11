//! Adapter for the layout engine's element JSON.
//!
//! The engine serializes each chunk as an element dict:
//!
//! ```json
//! {"type": "CompositeElement", "element_id": "...", "text": "...",
//!  "metadata": {"page_number": 1, "orig_elements": "<base64 zlib json>"}}
//! ```
//!
//! `orig_elements` lists the elements the chunk was built from, in the same
//! dict shape, either inline as a JSON array or as base64 of the compressed
//! JSON. Element dicts carry `metadata.coordinates.points` and, for image and
//! table blocks, `metadata.image_base64` and `metadata.image_mime_type`.
//!
//! This is the only place an element's kind is derived from its type name.

use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::{GzDecoder, ZlibDecoder};
use serde::Deserialize;
use tracing::warn;

use crate::element::{Chunk, Element, ElementContent, ElementKind};
use crate::error::{ChunkError, Result};
use crate::utils::Point;

/// MIME type assumed when the engine omits one for an extracted block.
pub const DEFAULT_BLOCK_MIME_TYPE: &str = "image/jpeg";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    element_type: String,
    #[serde(default)]
    element_id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    page_number: Option<u32>,
    #[serde(default)]
    coordinates: Option<RawCoordinates>,
    #[serde(default)]
    image_base64: Option<String>,
    #[serde(default)]
    image_mime_type: Option<String>,
    #[serde(default)]
    orig_elements: Option<OrigElements>,
}

#[derive(Debug, Deserialize)]
struct RawCoordinates {
    #[serde(default)]
    points: Vec<Point>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrigElements {
    Inline(Vec<RawElement>),
    Encoded(String),
}

/// Maps an engine type name to an element kind.
///
/// `Image` is an image block; `Table` and `TableChunk` (a table split by the
/// chunker) are table blocks. Every other type (titles, narrative text, list
/// items, captions, headers, ...) is text.
pub fn element_kind(type_name: &str) -> ElementKind {
    match type_name {
        "Image" => ElementKind::Image,
        "Table" | "TableChunk" => ElementKind::Table,
        _ => ElementKind::Text,
    }
}

/// Parses engine output (a JSON array of chunk dicts) into chunks.
///
/// A chunk dict without `orig_elements` is taken as a chunk of one element,
/// itself. Malformed JSON or elements without a page number are reported as
/// [`ChunkError::UpstreamParsing`].
pub fn parse_chunks(json: &[u8]) -> Result<Vec<Chunk>> {
    let raw: Vec<RawElement> = serde_json::from_slice(json)
        .map_err(|e| ChunkError::UpstreamParsing(format!("invalid element json: {e}")))?;
    raw.into_iter().map(convert_chunk).collect()
}

/// Decodes a base64 `orig_elements` payload into its JSON text.
///
/// The payload is zlib-compressed; gzip framing is accepted as well.
pub fn decode_orig_elements(encoded: &str) -> Result<String> {
    let compressed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ChunkError::UpstreamParsing(format!("orig_elements is not base64: {e}")))?;

    let mut json = String::new();
    let res = if compressed.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(compressed.as_slice()).read_to_string(&mut json)
    } else {
        ZlibDecoder::new(compressed.as_slice()).read_to_string(&mut json)
    };
    res.map_err(|e| ChunkError::UpstreamParsing(format!("orig_elements does not inflate: {e}")))?;
    Ok(json)
}

fn convert_chunk(mut raw: RawElement) -> Result<Chunk> {
    let elements = match raw.metadata.orig_elements.take() {
        Some(OrigElements::Inline(items)) => items,
        Some(OrigElements::Encoded(encoded)) => {
            let json = decode_orig_elements(&encoded)?;
            serde_json::from_str(&json).map_err(|e| {
                ChunkError::UpstreamParsing(format!("invalid orig_elements json: {e}"))
            })?
        }
        None => vec![raw],
    };

    elements
        .into_iter()
        .map(convert_element)
        .collect::<Result<Vec<_>>>()
        .map(Chunk::new)
}

fn convert_element(raw: RawElement) -> Result<Element> {
    let RawElement {
        element_type,
        element_id,
        text,
        metadata,
    } = raw;

    let page_number = metadata.page_number.ok_or_else(|| {
        ChunkError::UpstreamParsing(format!(
            "{} element {} has no page_number",
            element_type,
            element_id.as_deref().unwrap_or("<unknown>")
        ))
    })?;
    let points = metadata.coordinates.map(|c| c.points).unwrap_or_default();

    let content = match element_kind(&element_type) {
        ElementKind::Text => ElementContent::Text(text.unwrap_or_default()),
        kind => {
            let payload = metadata.image_base64.unwrap_or_else(|| {
                warn!(element_type = %element_type, page_number, "block has no image payload");
                String::new()
            });
            let mime_type = metadata
                .image_mime_type
                .unwrap_or_else(|| DEFAULT_BLOCK_MIME_TYPE.to_string());
            if kind == ElementKind::Image {
                ElementContent::Image { payload, mime_type }
            } else {
                ElementContent::Table { payload, mime_type }
            }
        }
    };

    Ok(Element {
        page_number,
        points,
        content,
    })
}
