//! HTML parser for extracting page content and links
//!
//! This module turns a response body into the raw material the extractor and
//! the crawl engine work from:
//! - Page title (from the first `<title>` tag)
//! - Every text node in document order
//! - Image sources (from `<img src>`)
//! - Anchor targets (from `<a href>`), unresolved
//!
//! Parsing is best effort. html5ever recovers from any malformed markup, so
//! there is no failure case.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Raw text of the first `<title>`; `None` only when there is no title element
    pub title: Option<String>,

    /// Raw text node contents in document order, whitespace included
    pub text_nodes: Vec<String>,

    /// Raw `src` attributes of `<img>` elements, in document order
    pub image_sources: Vec<String>,

    /// Raw `href` attributes of `<a>` elements, in document order
    pub anchors: Vec<String>,
}

/// Parses HTML content into a [`ParsedDocument`]
///
/// Comment nodes and the doctype are not text nodes and never appear in
/// `text_nodes`. Text inside `<script>` and `<style>` does.
///
/// The title is taken verbatim, so an empty `<title></title>` yields
/// `Some("")` rather than `None`.
///
/// # Example
///
/// ```
/// use sumi_harvest::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.anchors, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedDocument {
    let document = Html::parse_document(html);

    ParsedDocument {
        title: extract_title(&document),
        text_nodes: extract_text_nodes(&document),
        image_sources: extract_attribute(&document, "img[src]", "src"),
        anchors: extract_attribute(&document, "a[href]", "href"),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Collects every text node in document order
fn extract_text_nodes(document: &Html) -> Vec<String> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_text())
        .map(|text| {
            let text: &str = text;
            text.to_owned()
        })
        .collect()
}

/// Collects one attribute from every element matching a selector
fn extract_attribute(document: &Html, selector: &str, attribute: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .map(str::to_string)
        .collect()
}
