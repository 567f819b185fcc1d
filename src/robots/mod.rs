//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt files, and the [`RobotsGate`] the crawl loop asks before every
//! page fetch.
//!
//! The gate fails open: when robots.txt cannot be retrieved the fetch is
//! permitted. Only a rule set that was actually obtained can deny a URL.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::{product_token, ParsedRobots};

use crate::crawler::Fetcher;
use crate::url::{authority, robots_url};
use crate::UrlError;
use thiserror::Error;
use url::Url;

/// Reasons a robots.txt file could not be used
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("robots.txt request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("robots.txt at {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Cannot derive robots.txt location: {0}")]
    Url(#[from] UrlError),
}

/// Fetches and parses the robots.txt governing `page_url`
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - robots.txt was served with a 2xx status
/// * `Err(RobotsError)` - any other status, or a transport failure
pub async fn fetch_robots(fetcher: &Fetcher, page_url: &Url) -> Result<ParsedRobots, RobotsError> {
    let location = robots_url(page_url)?;
    tracing::debug!("Fetching {}", location);

    let (status, body) =
        fetcher
            .get_text(&location)
            .await
            .map_err(|message| RobotsError::Transport {
                url: location.to_string(),
                message,
            })?;

    if !status.is_success() {
        return Err(RobotsError::Status {
            url: location.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(ParsedRobots::from_content(&body))
}

/// Checks if a URL is allowed by robots.txt
pub fn is_allowed(robots: &ParsedRobots, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}

/// Decides whether a URL may be fetched
#[derive(Debug)]
pub struct RobotsGate {
    enabled: bool,
    user_agent: String,
    cache: RobotsCache,
}

impl RobotsGate {
    /// Creates a gate that identifies itself as `user_agent`
    ///
    /// A disabled gate permits everything without touching the network.
    pub fn new(enabled: bool, user_agent: impl Into<String>) -> Self {
        Self {
            enabled,
            user_agent: user_agent.into(),
            cache: RobotsCache::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of authorities whose robots.txt has been looked up
    pub fn authorities_checked(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if `url` may be fetched
    ///
    /// The first check against an authority fetches its robots.txt; later
    /// checks reuse the cached rule set, including a fail-open result.
    pub async fn can_fetch(&mut self, fetcher: &Fetcher, url: &Url) -> bool {
        if !self.enabled {
            return true;
        }

        let authority = match authority(url) {
            Ok(authority) => authority,
            Err(e) => {
                tracing::info!("Skipping robots.txt check for {}: {}", url, e);
                return true;
            }
        };

        if let Some(cached) = self.cache.get(&authority) {
            tracing::trace!(
                "Using cached robots.txt for {} ({}s old)",
                authority,
                cached.age().num_seconds()
            );
            return cached.is_allowed(url.as_str(), &self.user_agent);
        }

        let robots = match fetch_robots(fetcher, url).await {
            Ok(robots) => robots,
            Err(e) => {
                tracing::info!("robots.txt unavailable, proceeding: {}", e);
                ParsedRobots::allow_all()
            }
        };

        self.cache
            .insert(authority, robots)
            .is_allowed(url.as_str(), &self.user_agent)
    }
}
