use url::Url;

/// Resolves a link href against the page it was found on
///
/// Relative hrefs inherit scheme and host from `base`; absolute hrefs are
/// used verbatim.
///
/// Returns None if the link cannot be followed:
/// - empty or whitespace-only hrefs
/// - hrefs that fail to parse
/// - non-HTTP(S) URLs after resolution (javascript:, mailto:, data:, ...)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scrape::url::resolve_href;
///
/// let base = Url::parse("https://example.com/page/1").unwrap();
/// assert_eq!(
///     resolve_href(&base, "/page/2").unwrap().as_str(),
///     "https://example.com/page/2"
/// );
/// ```
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        Ok(absolute) => {
            tracing::debug!("Skipping non-HTTP link {}", absolute);
            None
        }
        Err(e) => {
            tracing::debug!("Failed to resolve link {:?} against {}: {}", href, base, e);
            None
        }
    }
}
