use crate::output::OutputFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default delay baseline between requests in seconds
pub const DEFAULT_DELAY_SECS: f64 = 2.0;

/// Default upper bound of the random jitter added to each delay, in seconds
pub const DEFAULT_JITTER_SECS: f64 = 1.0;

/// Upper bound accepted for the delay and the jitter, in seconds (one day)
pub const MAX_PAUSE_SECS: f64 = 86_400.0;

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; SumiScrape/1.0; +https://github.com/sumi-scrape/sumi-scrape)";

/// Main configuration structure for Sumi-Scrape
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with defaults for everything except the target URL
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            crawl: CrawlConfig::for_url(url),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Page where the crawl starts
    pub url: String,

    /// CSS selector for the fragments to extract; whole pages are kept when absent
    #[serde(default)]
    pub selector: Option<String>,

    /// Attribute names to extract from each matched element, in output order
    #[serde(default)]
    pub attributes: Vec<String>,

    /// CSS selector locating the link to the next page
    #[serde(rename = "next-page", default)]
    pub next_page: Option<String>,

    /// Maximum number of pages to fetch
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Baseline wait between two requests (seconds)
    #[serde(rename = "delay", default = "default_delay")]
    pub delay_secs: f64,

    /// Upper bound of the uniform jitter added to the baseline (seconds)
    #[serde(rename = "jitter", default = "default_jitter")]
    pub jitter_secs: f64,

    /// User-Agent string, also used for robots.txt matching
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whether robots.txt rules are honored
    #[serde(rename = "respect-robots", default = "default_respect_robots")]
    pub respect_robots: bool,
}

impl CrawlConfig {
    /// Builds a crawl configuration with defaults for everything except the URL
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            selector: None,
            attributes: Vec::new(),
            next_page: None,
            max_pages: default_max_pages(),
            timeout_secs: default_timeout(),
            delay_secs: default_delay(),
            jitter_secs: default_jitter(),
            user_agent: default_user_agent(),
            respect_robots: default_respect_robots(),
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Content selector, treating an empty string as unset
    pub fn content_selector(&self) -> Option<&str> {
        non_empty(self.selector.as_deref())
    }

    /// Next-page selector, treating an empty string as unset
    pub fn next_page_selector(&self) -> Option<&str> {
        non_empty(self.next_page.as_deref())
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Serialization format
    #[serde(default)]
    pub format: OutputFormat,

    /// File to write; stdout when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn default_max_pages() -> u32 {
    1
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_SECS
}

fn default_jitter() -> f64 {
    DEFAULT_JITTER_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_respect_robots() -> bool {
    true
}
