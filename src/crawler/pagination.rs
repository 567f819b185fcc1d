//! Next-page discovery
//!
//! Finds the link to the next page of a listing through a CSS selector. A
//! match may be the anchor itself (`a.next`) or a container holding it
//! (`li.next`, `.pagination .next`).

use crate::url::resolve_href;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Returns the href a selector match points to, if any
///
/// Anchors supply their own `href`; any other element supplies the `href` of
/// its first descendant anchor.
fn candidate_href<'a>(element: ElementRef<'a>, anchor: &Selector) -> Option<&'a str> {
    if element.value().name() == "a" {
        return element.value().attr("href");
    }

    element
        .select(anchor)
        .next()
        .and_then(|link| link.value().attr("href"))
}

/// Resolves the absolute URL of the next page
///
/// # Arguments
///
/// * `content` - HTML of the current page
/// * `selector` - Next-page selector; None disables pagination
/// * `current_url` - URL of the current page, used as the base for relative links
///
/// # Returns
///
/// The first match (in document order) yielding a followable link, resolved
/// against `current_url`, or None when there is no next page.
///
/// # Example
///
/// ```
/// use scraper::Selector;
/// use sumi_scrape::crawler::find_next;
/// use url::Url;
///
/// let html = r#"<nav><a class="next" href="/page/2">Next</a></nav>"#;
/// let selector = Selector::parse("a.next").unwrap();
/// let current = Url::parse("https://example.com/page/1").unwrap();
/// let next = find_next(html, Some(&selector), &current).unwrap();
/// assert_eq!(next.as_str(), "https://example.com/page/2");
/// ```
pub fn find_next(content: &str, selector: Option<&Selector>, current_url: &Url) -> Option<Url> {
    let selector = selector?;
    let anchor = Selector::parse("a").ok()?;
    let document = Html::parse_document(content);

    document
        .select(selector)
        .filter_map(|element| candidate_href(element, &anchor))
        .find_map(|href| resolve_href(current_url, href))
}
