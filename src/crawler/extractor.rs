//! Record extraction from HTML
//!
//! Each element matched by the content selector becomes one [`Record`]. The
//! configured attribute names decide which fields the record carries:
//!
//! | Name | Value |
//! |------|-------|
//! | `text` | Text nodes of the element, each trimmed, joined without a separator |
//! | `html` | Outer HTML of the element |
//! | `href` | `href` attribute, anchors (`<a>`) only |
//! | `src` | `src` attribute, `img`/`iframe`/`video`/`source` only |
//! | anything else | Attribute of that literal name |
//!
//! Missing values are empty strings, so every record of one call has exactly
//! the configured keys in the configured order.

use crate::record::{Record, CONTENT_KEY};
use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};

/// Elements whose `src` attribute is reported for the `src` attribute name
const SRC_ELEMENTS: &[&str] = &["img", "iframe", "video", "source"];

/// Compiles a CSS selector, reporting a readable error
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// One selector match: a single element, or the whole document when no
/// selector is configured
#[derive(Clone, Copy)]
pub enum Matched<'a> {
    Document(&'a Html),
    Element(ElementRef<'a>),
}

impl<'a> Matched<'a> {
    /// Tag name of the element; the document has none
    fn name(&self) -> Option<&'a str> {
        match self {
            Self::Document(_) => None,
            Self::Element(element) => Some(element.value().name()),
        }
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        match self {
            Self::Document(_) => None,
            Self::Element(element) => element.value().attr(name),
        }
    }

    /// Text nodes in document order, each trimmed, joined without a separator
    fn text(&self) -> String {
        let nodes = match self {
            Self::Document(document) => document.root_element().text(),
            Self::Element(element) => element.text(),
        };
        nodes
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn markup(&self) -> String {
        match self {
            Self::Document(document) => document.html(),
            Self::Element(element) => element.html(),
        }
    }
}

/// Extraction function for one attribute name
type Extraction = fn(&Matched<'_>, &str) -> String;

/// Attribute names with dedicated extraction rules; anything else falls back
/// to [`extract_named`]
const SPECIAL_ATTRIBUTES: &[(&str, Extraction)] = &[
    ("text", extract_text),
    ("html", extract_html),
    ("href", extract_href),
    ("src", extract_src),
];

fn extract_text(matched: &Matched<'_>, _name: &str) -> String {
    matched.text()
}

fn extract_html(matched: &Matched<'_>, _name: &str) -> String {
    matched.markup()
}

fn extract_href(matched: &Matched<'_>, name: &str) -> String {
    match matched.name() {
        Some("a") => extract_named(matched, name),
        _ => String::new(),
    }
}

fn extract_src(matched: &Matched<'_>, name: &str) -> String {
    match matched.name() {
        Some(tag) if SRC_ELEMENTS.contains(&tag) => extract_named(matched, name),
        _ => String::new(),
    }
}

fn extract_named(matched: &Matched<'_>, name: &str) -> String {
    matched.attr(name).unwrap_or_default().to_string()
}

/// Looks up the extraction function for an attribute name
fn extraction_for(name: &str) -> Extraction {
    SPECIAL_ATTRIBUTES
        .iter()
        .find(|(special, _)| *special == name)
        .map(|(_, extraction)| *extraction)
        .unwrap_or(extract_named)
}

/// Extracts records from HTML content
///
/// # Arguments
///
/// * `content` - The HTML to parse
/// * `selector` - Elements to turn into records; the whole document when None
/// * `attributes` - Attribute names to extract, in output order
///
/// # Returns
///
/// One record per match, in document order. A selector matching nothing
/// yields an empty vector.
///
/// # Example
///
/// ```
/// use sumi_scrape::crawler::{extract, parse_selector};
///
/// let html = r#"<ul><li class="item">A</li><li class="item">B</li></ul>"#;
/// let selector = parse_selector(".item").unwrap();
/// let records = extract(html, Some(&selector), &["text".to_string()]);
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].get("text"), Some("B"));
/// ```
pub fn extract(content: &str, selector: Option<&Selector>, attributes: &[String]) -> Vec<Record> {
    let document = Html::parse_document(content);

    let matches: Vec<Matched<'_>> = match selector {
        Some(selector) => document.select(selector).map(Matched::Element).collect(),
        None => vec![Matched::Document(&document)],
    };

    if attributes.is_empty() {
        return matches
            .iter()
            .map(|matched| {
                let value = if selector.is_some() {
                    matched.text()
                } else {
                    matched.markup()
                };
                [(CONTENT_KEY, value)].into_iter().collect::<Record>()
            })
            .collect();
    }

    let plan: Vec<(&str, Extraction)> = attributes
        .iter()
        .map(|name| (name.as_str(), extraction_for(name)))
        .collect();

    matches
        .iter()
        .map(|matched| {
            plan.iter()
                .map(|(name, extraction)| (*name, extraction(matched, name)))
                .collect::<Record>()
        })
        .collect()
}
