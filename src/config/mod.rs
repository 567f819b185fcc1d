//! Configuration module for Sumi-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The command-line front end builds the same [`Config`] from flags
//! and runs it through [`validate_config`] before a crawl starts.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawl.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, OutputConfig, DEFAULT_DELAY_SECS, DEFAULT_JITTER_SECS,
    MAX_PAUSE_SECS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate as validate_config;
pub(crate) use validation::validate_seconds;
