/// Pseudo-protocols that never lead to a fetchable page
const NON_FETCHABLE_SCHEMES: [&str; 4] = ["mailto:", "javascript:", "tel:", "data:"];

/// Returns false for hrefs using a non-fetchable pseudo-protocol
///
/// The check runs on the raw href before resolution and ignores ASCII case and
/// leading whitespace.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::is_fetchable_href;
///
/// assert!(is_fetchable_href("/about"));
/// assert!(!is_fetchable_href("mailto:someone@example.com"));
/// assert!(!is_fetchable_href("JavaScript:void(0)"));
/// ```
pub fn is_fetchable_href(href: &str) -> bool {
    let href = href.trim_start();
    !NON_FETCHABLE_SCHEMES.iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// Returns true if the raw href starts with any excluded prefix
///
/// Matching is a literal prefix test on the href as written in the page, not on
/// the resolved URL: `/private/page` is excluded by `/private`, but the
/// relative `page` on a `/private/` page is not.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::is_excluded;
///
/// let excluded = vec!["/private".to_string()];
/// assert!(is_excluded("/private/page", &excluded));
/// assert!(!is_excluded("/public", &excluded));
/// ```
pub fn is_excluded(href: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| href.starts_with(prefix.as_str()))
}
