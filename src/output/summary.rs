//! Crawl summary for the terminal
//!
//! A short human-readable report of how the crawl went, printed to stderr
//! after the records have been written.

use crate::crawler::CrawlReport;

/// Formats a crawl report as a few lines of text
///
/// # Arguments
///
/// * `report` - The finished crawl
///
/// # Returns
///
/// The summary, ending with a newline
pub fn format_summary(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Summary ===\n");
    out.push_str(&format!("  Pages fetched: {}\n", report.pages_fetched));
    out.push_str(&format!("  Records: {}\n", report.record_count()));
    out.push_str(&format!("  Last URL: {}\n", report.last_url));
    out.push_str(&format!(
        "  Duration: {:.2}s\n",
        report.duration().num_milliseconds() as f64 / 1000.0
    ));

    let status = if report.is_success() { "ok" } else { "failed" };
    out.push_str(&format!("  Stopped: {} ({})\n", report.stop_reason, status));

    out
}

/// Notice for a crawl that produced no records, if it applies
///
/// Reported on stderr so that stdout keeps carrying only data.
pub fn no_data_notice(report: &CrawlReport) -> Option<&'static str> {
    if report.records.is_empty() {
        Some("No data extracted")
    } else {
        None
    }
}
