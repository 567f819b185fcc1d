//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageCursor`: the page about to be fetched and the pages-fetched counter
//! - `CrawlState`: the cursor plus the records accumulated so far
//! - `StopReason`: why the crawl loop terminated

mod cursor;
mod stop_reason;

// Re-export main types
pub use cursor::{CrawlState, PageCursor};
pub use stop_reason::StopReason;
