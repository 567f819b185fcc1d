//! Plain-text output
//!
//! One block per record, each followed by a blank line.

use crate::crawler::RecordLayout;
use crate::output::traits::{OutputResult, Renderer};
use crate::record::{Record, CONTENT_KEY, HTML_KEY, TEXT_KEY};

/// Renders records as human-readable text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// The text shown for a single record
    ///
    /// Whole-page records show their HTML. Fragments show `text`, then
    /// `content`, and otherwise the record as compact JSON.
    fn record_text(record: &Record, layout: RecordLayout) -> OutputResult<String> {
        if layout == RecordLayout::WholePage {
            return Ok(record.get(HTML_KEY).unwrap_or_default().to_string());
        }

        if let Some(value) = record.get(TEXT_KEY).or_else(|| record.get(CONTENT_KEY)) {
            return Ok(value.to_string());
        }

        Ok(serde_json::to_string(record)?)
    }
}

impl Renderer for TextRenderer {
    fn render(&self, records: &[Record], layout: RecordLayout) -> OutputResult<String> {
        let mut out = String::new();
        for record in records {
            out.push_str(&Self::record_text(record, layout)?);
            out.push_str("\n\n");
        }
        Ok(out)
    }
}
