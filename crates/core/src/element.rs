//! Input element model.
//!
//! Elements are produced by a layout engine adapter (see [`crate::unstructured`])
//! and grouped into chunks. The element kind is decided once by the adapter;
//! the aggregator only ever matches on [`ElementKind`].

use crate::utils::{Point, PointSet};

/// Discriminant of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Image,
    Table,
}

/// Kind-specific content of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    /// A text run. May be empty.
    Text(String),
    /// A raster image block.
    Image {
        /// Base64-encoded raster data.
        payload: String,
        mime_type: String,
    },
    /// A table block, carried as a rendered raster.
    Table {
        /// Base64-encoded raster data.
        payload: String,
        mime_type: String,
    },
}

/// One classified unit of page content.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Page the element sits on (1-based).
    pub page_number: u32,
    /// Bounding polygon on that page.
    pub points: PointSet,
    pub content: ElementContent,
}

impl Element {
    /// Creates a text element.
    pub fn text(page_number: u32, points: Vec<Point>, text: impl Into<String>) -> Self {
        Self {
            page_number,
            points,
            content: ElementContent::Text(text.into()),
        }
    }

    /// Creates an image element.
    pub fn image(
        page_number: u32,
        points: Vec<Point>,
        payload: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            page_number,
            points,
            content: ElementContent::Image {
                payload: payload.into(),
                mime_type: mime_type.into(),
            },
        }
    }

    /// Creates a table element.
    pub fn table(
        page_number: u32,
        points: Vec<Point>,
        payload: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            page_number,
            points,
            content: ElementContent::Table {
                payload: payload.into(),
                mime_type: mime_type.into(),
            },
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self.content {
            ElementContent::Text(_) => ElementKind::Text,
            ElementContent::Image { .. } => ElementKind::Image,
            ElementContent::Table { .. } => ElementKind::Table,
        }
    }

    /// Text of a text element, `None` for images and tables.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            ElementContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// An ordered group of elements belonging to one layout block, as decided by
/// the layout engine's chunking strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    pub elements: Vec<Element>,
}

impl Chunk {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl From<Vec<Element>> for Chunk {
    fn from(elements: Vec<Element>) -> Self {
        Self::new(elements)
    }
}
