//! Crawler module for page fetching and record extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-request timeout
//! - Record extraction through CSS selectors
//! - Next-page resolution
//! - Request pacing
//! - Overall crawl coordination

mod coordinator;
mod delay;
mod extractor;
mod fetcher;
mod pagination;
mod report;

pub use coordinator::{run_crawl, Coordinator, Step};
pub use delay::DelayPolicy;
pub use extractor::{extract, parse_selector, Matched};
pub use fetcher::{build_http_client, FetchOutcome, Fetcher};
pub use pagination::find_next;
pub use report::{CrawlReport, RecordLayout};

use crate::config::CrawlConfig;
use crate::ScrapeError;

/// Runs a complete crawl operation
///
/// This is the main entry point for library users. It will:
/// 1. Compile the selectors and build the HTTP client
/// 2. Fetch pages sequentially, honouring robots.txt and the delay
/// 3. Extract records and follow the next-page link
/// 4. Stop on the page limit, the last page, or the first failure
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; check `stop_reason` for how it ended
/// * `Err(ScrapeError)` - The crawl could not be set up
pub async fn crawl(config: &CrawlConfig) -> Result<CrawlReport, ScrapeError> {
    run_crawl(config, None).await
}
