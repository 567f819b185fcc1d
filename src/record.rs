//! Extracted records
//!
//! A [`Record`] is one unit of scraped data: an insertion-ordered mapping from
//! attribute name to string value. Key order follows the configured attribute
//! list and survives serialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key holding the page URL in whole-page records
pub const URL_KEY: &str = "url";

/// Key holding the raw page body in whole-page records
pub const HTML_KEY: &str = "html";

/// Key used when no attribute names are configured
pub const CONTENT_KEY: &str = "content";

/// Key holding an element's visible text
pub const TEXT_KEY: &str = "text";

/// One extracted record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a whole-page record `{url, html}`
    pub fn whole_page(url: &str, body: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.insert(URL_KEY, url);
        record.insert(HTML_KEY, body);
        record
    }

    /// Sets a field, keeping its original position if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}
