use crate::config::types::{Config, CrawlConfig, OutputConfig, MAX_PAUSE_SECS};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_target_url(&config.url)?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1 second, got {}",
            config.timeout_secs
        )));
    }

    validate_seconds("delay", config.delay_secs)?;
    validate_seconds("jitter", config.jitter_secs)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if let Some(name) = config.attributes.iter().find(|a| a.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "attribute names cannot be empty, got {:?}",
            name
        )));
    }

    let mut seen = HashSet::new();
    if let Some(name) = config.attributes.iter().find(|a| !seen.insert(a.as_str())) {
        return Err(ConfigError::Validation(format!(
            "attribute {:?} is listed more than once",
            name
        )));
    }

    if let Some(selector) = config.content_selector() {
        validate_selector("selector", selector)?;
    }

    if let Some(selector) = config.next_page_selector() {
        validate_selector("next_page", selector)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the crawl start URL: must parse, be HTTP(S) and carry a host
fn validate_target_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid url '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "url '{}' must use http or https",
            raw
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "url '{}' has no host",
            raw
        )));
    }

    Ok(())
}

/// Validates a duration expressed in (possibly fractional) seconds
///
/// The value must convert to a [`Duration`] and stay within [`MAX_PAUSE_SECS`].
pub(crate) fn validate_seconds(field: &str, value: f64) -> Result<Duration, ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a finite number >= 0, got {}",
            field, value
        )));
    }
    if value > MAX_PAUSE_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be at most {} seconds, got {}",
            field, MAX_PAUSE_SECS, value
        )));
    }
    Duration::try_from_secs_f64(value).map_err(|e| {
        ConfigError::Validation(format!("{} of {} seconds is not usable: {}", field, value, e))
    })
}

/// Validates that a selector string is well-formed CSS
fn validate_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} '{}': {}", field, selector, e))
    })?;
    Ok(())
}
