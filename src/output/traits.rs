//! Renderer trait and output errors
//!
//! Every output format implements [`Renderer`], which turns the collected
//! records into the complete text of the output.

use crate::crawler::RecordLayout;
use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes a record list into one output document
pub trait Renderer {
    /// Renders every record, in order
    ///
    /// # Arguments
    ///
    /// * `records` - The records to serialize
    /// * `layout` - Whether the records are selector fragments or whole pages
    fn render(&self, records: &[Record], layout: RecordLayout) -> OutputResult<String>;
}
