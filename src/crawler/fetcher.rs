//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for page content
//! - Mapping HTTP statuses and transport failures to a [`FetchOutcome`]
//!
//! There is no retry logic: a failed fetch is reported once and the crawl
//! loop decides what to do with it.

use crate::config::CrawlConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
        /// HTTP status code
        status_code: u16,
    },

    /// The robots.txt policy forbids the request
    Denied {
        /// Why the request was refused
        reason: String,
    },

    /// Connection, timeout, TLS, or HTTP status failure
    TransportError {
        /// Human-readable diagnostic
        message: String,
    },
}

impl FetchOutcome {
    /// Returns true if the page body is available
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sumi_scrape::config::CrawlConfig;
/// use sumi_scrape::crawler::build_http_client;
///
/// let config = CrawlConfig::for_url("https://example.com/");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Owns the HTTP session for one crawl
///
/// The policy gate borrows the fetcher for its robots.txt requests so that
/// every request of a crawl goes through the same connection pool and
/// identification headers.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: String,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        })
    }

    /// The User-Agent sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetches a page
    ///
    /// # Status Mapping
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | 2xx / 3xx | Success |
    /// | Any other status | TransportError (`HTTP <code>`) |
    /// | Timeout | TransportError |
    /// | DNS / connection refused / TLS | TransportError |
    /// | Body not decodable as text | TransportError |
    ///
    /// This never returns `Denied`; that variant is produced by the policy gate.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        tracing::debug!("GET {}", url);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::TransportError {
                    message: self.describe_error(&e),
                }
            }
        };

        let status = response.status();
        if !is_acceptable(status) {
            return FetchOutcome::TransportError {
                message: format!("HTTP {}", status),
            };
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                body,
                status_code: status.as_u16(),
            },
            Err(e) => FetchOutcome::TransportError {
                message: self.describe_error(&e),
            },
        }
    }

    /// Issues a GET and returns the status and body without judging the status
    pub(crate) async fn get_text(&self, url: &Url) -> Result<(StatusCode, String), String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.describe_error(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.describe_error(&e))?;
        Ok((status, body))
    }

    /// Classifies a reqwest error into a readable diagnostic
    fn describe_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("Request timeout after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else if e.is_redirect() {
            format!("Redirect error: {}", e)
        } else if e.is_decode() || e.is_body() {
            format!("Failed to read response body: {}", e)
        } else {
            e.to_string()
        }
    }
}

fn is_acceptable(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}
