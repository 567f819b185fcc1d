//! Output module for serializing crawl results
//!
//! This module handles:
//! - Rendering records as text, JSON, or CSV
//! - Writing the rendered output to a file or stdout
//! - Summarizing a finished crawl for the terminal

mod json;
mod summary;
mod tabular;
mod text;
mod traits;

pub use json::JsonRenderer;
pub use summary::{format_summary, no_data_notice};
pub use tabular::CsvRenderer;
pub use text::TextRenderer;
pub use traits::{OutputError, OutputResult, Renderer};

use crate::crawler::{CrawlReport, RecordLayout};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Supported serialization formats
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One block of text per record
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl OutputFormat {
    /// The renderer implementing this format
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Self::Text => Box::new(TextRenderer),
            Self::Json => Box::new(JsonRenderer),
            Self::Csv => Box::new(CsvRenderer),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Renders records in the given format
pub fn render(
    records: &[Record],
    layout: RecordLayout,
    format: OutputFormat,
) -> OutputResult<String> {
    format.renderer().render(records, layout)
}

/// Renders a crawl report and writes it out
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `format` - Output format
/// * `path` - Destination file; stdout when None
///
/// # Returns
///
/// * `Ok(())` - Output written
/// * `Err(OutputError)` - Rendering failed or the destination was not writable
pub fn write_output(
    report: &CrawlReport,
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = render(&report.records, report.layout, format)?;

    match path {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes()).map_err(|source| OutputError::Write {
                path: path.display().to_string(),
                source,
            })?;
            tracing::info!(
                "Wrote {} record(s) as {} to {}",
                report.record_count(),
                format,
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
