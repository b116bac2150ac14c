//! Page record extraction

use crate::crawler::parser::ParsedDocument;
use crate::output::{PageMetadata, PageRecord, UNTITLED};
use crate::url::resolve_href;
use url::Url;

/// Builds the persisted record for a fetched page
///
/// - title is kept as written, and falls back to `"Untitled"` only when the
///   page has no title element
/// - text nodes are trimmed; blank ones are dropped
/// - image sources are resolved against the page URL; empty or unresolvable
///   sources are dropped
pub fn extract_page(page_url: &Url, document: &ParsedDocument) -> PageRecord {
    PageRecord {
        metadata: PageMetadata {
            url: page_url.to_string(),
            title: document
                .title
                .clone()
                .unwrap_or_else(|| UNTITLED.to_string()),
        },
        text_elements: clean_text_elements(&document.text_nodes),
        image_links: resolve_images(page_url, &document.image_sources),
    }
}

/// Trims text nodes and keeps the non-empty ones, in order
pub fn clean_text_elements(nodes: &[String]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| node.trim())
        .filter(|node| !node.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve_images(page_url: &Url, sources: &[String]) -> Vec<String> {
    sources
        .iter()
        .filter(|src| !src.is_empty())
        .filter_map(|src| match resolve_href(page_url, src) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::debug!("Skipping image: {}", e);
                None
            }
        })
        .collect()
}
