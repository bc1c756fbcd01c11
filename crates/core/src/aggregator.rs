//! Layout aggregator.
//!
//! Walks the chunk stream once and turns it into output records:
//! - images and tables become standalone records at their position;
//! - text elements of a chunk are grouped into one text record, emitted when
//!   the chunk ends, with one merged rectangle per page run.
//!
//! The aggregator holds all pass state explicitly. Each invocation of
//! [`aggregate`] owns a fresh [`LayoutAggregator`], so concurrent callers never
//! share accumulators.

use tracing::{debug, info};

use crate::element::{Chunk, Element, ElementContent};
use crate::error::Result;
use crate::record::{PageBox, Record, RecordType};
use crate::utils::{PointSet, merge_bounding_boxes};

/// Page number the text accumulator starts on before any element is seen.
pub const INITIAL_PAGE_NUMBER: u32 = 1;

/// Stateful single-pass aggregator over a chunk stream.
#[derive(Debug)]
pub struct LayoutAggregator {
    resource_id: String,
    records: Vec<Record>,
    current_page_number: u32,
    current_text_group: Vec<String>,
    current_bounding_boxes: Vec<PointSet>,
    current_bounding_box_merged: Vec<PageBox>,
}

impl LayoutAggregator {
    /// Create an aggregator whose record ids are prefixed with `resource_id`.
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            records: Vec::new(),
            current_page_number: INITIAL_PAGE_NUMBER,
            current_text_group: Vec::new(),
            current_bounding_boxes: Vec::new(),
            current_bounding_box_merged: Vec::new(),
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Records emitted so far.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the aggregator and return its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Process one chunk: emit its images and tables in place, then flush
    /// the chunk's text group as at most one text record.
    pub fn receive_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        for element in &chunk.elements {
            self.receive_element(element)?;
        }
        self.close_bounding_box()?;
        self.flush_text_group();
        Ok(())
    }

    fn receive_element(&mut self, element: &Element) -> Result<()> {
        match &element.content {
            ElementContent::Image { payload, mime_type } => {
                self.push_block(RecordType::Image, element, payload, mime_type);
            }
            ElementContent::Table { payload, mime_type } => {
                self.push_block(RecordType::Table, element, payload, mime_type);
            }
            ElementContent::Text(text) => {
                if element.page_number != self.current_page_number {
                    if !self.current_bounding_boxes.is_empty() {
                        self.close_bounding_box()?;
                    }
                    self.current_page_number = element.page_number;
                }
                self.current_text_group.push(text.clone());
                self.current_bounding_boxes.push(element.points.clone());
            }
        }
        Ok(())
    }

    fn push_block(
        &mut self,
        record_type: RecordType,
        element: &Element,
        payload: &str,
        mime_type: &str,
    ) {
        debug!(
            record_type = %record_type,
            page = element.page_number,
            index = self.records.len(),
            "emitting block record"
        );
        let record = Record::block(
            &self.resource_id,
            self.records.len(),
            record_type,
            payload.to_string(),
            mime_type.to_string(),
            PageBox::new(element.page_number, element.points.clone()),
        );
        self.records.push(record);
    }

    /// Merge the pending point sets into one rectangle attributed to the
    /// current page and clear the buffer. A no-op when nothing is pending.
    fn close_bounding_box(&mut self) -> Result<()> {
        if self.current_bounding_boxes.is_empty() {
            return Ok(());
        }
        let quad = merge_bounding_boxes(&self.current_bounding_boxes)?;
        self.current_bounding_box_merged
            .push(PageBox::from_quad(self.current_page_number, quad));
        self.current_bounding_boxes.clear();
        Ok(())
    }

    /// Emit the pending text group as one record if it has visible content,
    /// then clear the text and merged-box buffers.
    fn flush_text_group(&mut self) {
        if !self.current_text_group.is_empty() {
            let content = join_fragments(&self.current_text_group);
            if !content.is_empty() {
                let record = Record::text(
                    &self.resource_id,
                    self.records.len(),
                    content,
                    self.current_bounding_box_merged.clone(),
                );
                self.records.push(record);
            }
        }
        self.current_text_group.clear();
        self.current_bounding_box_merged.clear();
    }
}

/// Join text fragments with single spaces and trim the result. Empty
/// fragments are skipped so they add no whitespace.
fn join_fragments(fragments: &[String]) -> String {
    let joined = fragments
        .iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    joined.trim().to_string()
}

/// Aggregate a chunk stream into records whose ids are prefixed with
/// `resource_id`.
///
/// Any failure aborts the whole pass; partial output is never returned.
pub fn aggregate(chunks: &[Chunk], resource_id: &str) -> Result<Vec<Record>> {
    info!(resource_id, chunks = chunks.len(), "aggregating layout chunks");
    let mut aggregator = LayoutAggregator::new(resource_id);
    for (idx, chunk) in chunks.iter().enumerate() {
        debug!(chunk = idx, elements = chunk.len(), "processing chunk");
        aggregator.receive_chunk(chunk)?;
    }
    let records = aggregator.into_records();
    info!(resource_id, records = records.len(), "aggregation done");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn join_skips_empty_fragments() {
        assert_eq!(join_fragments(&frags(&["Hello", "", "world"])), "Hello world");
        assert_eq!(join_fragments(&frags(&["", ""])), "");
        assert_eq!(join_fragments(&frags(&["  a ", "b  "])), "a  b");
    }

    #[test]
    fn close_on_empty_buffer_is_noop() {
        let mut agg = LayoutAggregator::new("r");
        agg.close_bounding_box().unwrap();
        assert!(agg.current_bounding_box_merged.is_empty());
    }

    #[test]
    fn page_change_moves_current_page() {
        let mut agg = LayoutAggregator::new("r");
        let el = Element::text(3, vec![(0.0, 0.0)], "x");
        agg.receive_element(&el).unwrap();
        assert_eq!(agg.current_page_number, 3);
        assert!(agg.current_bounding_box_merged.is_empty());
        assert_eq!(agg.current_bounding_boxes.len(), 1);
    }

    #[test]
    fn page_state_carries_across_chunks() {
        let mut agg = LayoutAggregator::new("r");
        agg.receive_chunk(&Chunk::new(vec![Element::text(2, vec![(0.0, 0.0)], "a")]))
            .unwrap();
        assert_eq!(agg.current_page_number, 2);
        assert!(agg.current_text_group.is_empty());
        assert!(agg.current_bounding_boxes.is_empty());
        assert!(agg.current_bounding_box_merged.is_empty());
    }
}
