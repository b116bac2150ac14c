//! URL handling module for Sumi-Harvest
//!
//! This module provides href resolution, network-location extraction and
//! internal/external classification, plus the raw-href filters applied before
//! any link is followed.

mod domain;
mod matcher;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{is_internal, network_location, NetworkLocation};
pub use matcher::{is_excluded, is_fetchable_href};

/// Resolves an href against the URL of the page it appears on
///
/// Uses standard relative reference resolution, so path-relative,
/// root-relative, scheme-relative, query-only and fragment-only hrefs all
/// behave as a browser would resolve them. No further canonicalization is
/// applied.
///
/// # Arguments
///
/// * `base` - The URL of the page containing the href
/// * `href` - The raw attribute value
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_harvest::url::resolve_href;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(
///     resolve_href(&base, "setup").unwrap().as_str(),
///     "https://example.com/docs/setup"
/// );
/// ```
pub fn resolve_href(base: &Url, href: &str) -> UrlResult<Url> {
    base.join(href)
        .map_err(|e| UrlError::Parse(format!("cannot resolve '{}' against {}: {}", href, base, e)))
}

/// Returns true if a resolved URL uses a scheme the fetcher can retrieve
pub fn is_http_url(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}
