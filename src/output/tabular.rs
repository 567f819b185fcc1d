//! CSV output
//!
//! The header row comes from the first record's keys (`url,html` for
//! whole-page records). Later records are written in header order, with
//! missing keys left empty. Fields are quoted only when they contain a
//! delimiter, quote or line break; embedded quotes are doubled.

use crate::crawler::RecordLayout;
use crate::output::traits::{OutputError, OutputResult, Renderer};
use crate::record::{Record, HTML_KEY, URL_KEY};

/// Renders records as comma-separated values
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    fn header(records: &[Record], layout: RecordLayout) -> Vec<String> {
        match layout {
            RecordLayout::WholePage => vec![URL_KEY.to_string(), HTML_KEY.to_string()],
            RecordLayout::Fragments => records
                .first()
                .map(|first| first.keys().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

impl Renderer for CsvRenderer {
    fn render(&self, records: &[Record], layout: RecordLayout) -> OutputResult<String> {
        let header = Self::header(records, layout);
        if header.is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record(&header)?;
        for record in records {
            writer.write_record(header.iter().map(|key| record.get(key).unwrap_or_default()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| OutputError::Format(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
    }
}
