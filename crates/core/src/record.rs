//! Output records.
//!
//! A record is either one grouped text block or one standalone image/table.
//! Records serialize to the JSON shape downstream indexers consume:
//!
//! ```json
//! {"id": "doc_0", "content": "...", "type": "text",
//!  "bounding_box": [{"1": [[x0, y0], [x0, y1], [x1, y1], [x1, y0]]}]}
//! ```

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::utils::{Point, Quad};

/// Record type, serialized lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Text,
    Image,
    Table,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry attributed to one page: a merged rectangle for text groups, or
/// the raw polygon for images and tables.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBox {
    pub page_number: u32,
    pub points: Vec<Point>,
}

impl PageBox {
    pub fn new(page_number: u32, points: Vec<Point>) -> Self {
        Self {
            page_number,
            points,
        }
    }

    pub fn from_quad(page_number: u32, quad: Quad) -> Self {
        Self::new(page_number, quad.to_vec())
    }
}

impl Serialize for PageBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.page_number, &self.points)?;
        map.end()
    }
}

/// One emitted record.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Record {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub bounding_box: Vec<PageBox>,
}

/// Builds the identifier of the record emitted at `index`.
pub fn record_id(resource_id: &str, index: usize) -> String {
    format!("{resource_id}_{index}")
}

impl Record {
    /// Creates a grouped text record.
    pub fn text(
        resource_id: &str,
        index: usize,
        content: String,
        bounding_box: Vec<PageBox>,
    ) -> Self {
        Self {
            id: record_id(resource_id, index),
            content,
            record_type: RecordType::Text,
            mime_type: None,
            bounding_box,
        }
    }

    /// Creates a standalone image or table record carrying the raw payload
    /// and the element's unmerged polygon.
    pub fn block(
        resource_id: &str,
        index: usize,
        record_type: RecordType,
        payload: String,
        mime_type: String,
        page_box: PageBox,
    ) -> Self {
        Self {
            id: record_id(resource_id, index),
            content: payload,
            record_type,
            mime_type: Some(mime_type),
            bounding_box: vec![page_box],
        }
    }
}
