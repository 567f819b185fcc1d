use crate::record::Record;
use crate::state::StopReason;
use chrono::{DateTime, Utc};
use url::Url;

/// Shape of the records a crawl produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// One record per selector match, keyed by attribute name
    Fragments,

    /// One `{url, html}` record per fetched page
    WholePage,
}

/// Result of a finished crawl
///
/// Produced for every termination, including failures; `stop_reason` tells
/// them apart and `records` holds whatever was collected before the stop.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub records: Vec<Record>,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
    /// The page the crawl was positioned on when it stopped
    pub last_url: Url,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub layout: RecordLayout,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Returns true unless the crawl stopped on a policy denial or a fetch error
    pub fn is_success(&self) -> bool {
        !self.stop_reason.is_error()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
