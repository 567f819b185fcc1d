//! URL handling module for Sumi-Scrape
//!
//! This module provides authority extraction (the scope of a robots.txt file)
//! and resolution of relative links found in pages.

mod authority;
mod resolve;

pub use authority::{authority, robots_url};
pub use resolve::resolve_href;
