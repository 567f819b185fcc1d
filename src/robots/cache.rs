//! Per-authority robots.txt cache
//!
//! A crawl asks for robots.txt once per authority; every later check against
//! the same authority is answered from here. Entries live for one crawl only.

use crate::robots::ParsedRobots;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Cached robots.txt data for an authority
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt content
    pub content: ParsedRobots,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Creates a new CachedRobots instance stamped with the current time
    pub fn new(content: ParsedRobots) -> Self {
        Self {
            content,
            fetched_at: Utc::now(),
        }
    }

    /// Returns the age of the cached robots.txt
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks if a URL is allowed according to the cached robots.txt
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.content.is_allowed(url, user_agent)
    }
}

/// Robots.txt rule sets keyed by authority (`scheme://host[:port]`)
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: HashMap<String, CachedRobots>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached entry for an authority
    pub fn get(&self, authority: &str) -> Option<&CachedRobots> {
        self.entries.get(authority)
    }

    /// Stores the rule set for an authority, replacing any previous entry
    pub fn insert(&mut self, authority: impl Into<String>, robots: ParsedRobots) -> &CachedRobots {
        let authority = authority.into();
        self.entries.insert(authority.clone(), CachedRobots::new(robots));
        &self.entries[&authority]
    }

    /// Number of authorities seen so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
