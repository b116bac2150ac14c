//! Scheduler for the crawl frontier and request pacing
//!
//! This module handles:
//! - The depth-first frontier: a stack of fetched pages whose anchors are still
//!   being walked, one frame per page
//! - The per-page link-following counter, which lives in each frame
//! - The fixed delay applied before each request

use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A fetched page whose anchors are being walked
#[derive(Debug)]
pub struct PageFrame {
    /// The page URL (base for resolving its anchors)
    pub url: Url,

    /// Remaining depth budget of this page
    pub depth: u32,

    /// Raw hrefs not yet examined, in document order
    anchors: std::vec::IntoIter<String>,

    /// Links followed from this page so far
    followed: usize,

    /// Absolute URLs followed from this page so far
    followed_urls: HashSet<String>,
}

impl PageFrame {
    /// Creates a frame for a freshly fetched page
    pub fn new(url: Url, depth: u32, anchors: Vec<String>) -> Self {
        Self {
            url,
            depth,
            anchors: anchors.into_iter(),
            followed: 0,
            followed_urls: HashSet::new(),
        }
    }

    /// Takes the next unexamined href
    pub fn next_anchor(&mut self) -> Option<String> {
        self.anchors.next()
    }

    /// Returns true while this page may still follow another link
    pub fn can_follow(&self, max_links_per_page: usize) -> bool {
        self.followed < max_links_per_page
    }

    /// Returns true if `url` was already followed from this page
    pub fn has_followed(&self, url: &str) -> bool {
        self.followed_urls.contains(url)
    }

    /// Counts a link as followed from this page
    pub fn record_followed(&mut self, url: &Url) {
        self.followed += 1;
        self.followed_urls.insert(url.to_string());
    }

    /// Number of links followed from this page
    pub fn followed(&self) -> usize {
        self.followed
    }

    /// Depth budget handed to children of this page
    pub fn child_depth(&self) -> u32 {
        self.depth.saturating_sub(1)
    }
}

/// Depth-first frontier of pages with anchors left to walk
///
/// The top frame is always the most recently fetched page, so children are
/// fully explored before their next sibling is considered.
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<PageFrame>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a freshly fetched page
    pub fn push(&mut self, frame: PageFrame) {
        self.stack.push(frame);
    }

    /// The page currently being walked
    pub fn top_mut(&mut self) -> Option<&mut PageFrame> {
        self.stack.last_mut()
    }

    /// Removes the page currently being walked
    pub fn pop(&mut self) -> Option<PageFrame> {
        self.stack.pop()
    }

    /// Number of pages with anchors left to walk
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns whether the frontier is exhausted
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Applies the fixed inter-request delay
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    /// Creates a limiter waiting `delay` before each request
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay before a request
    ///
    /// # Returns
    ///
    /// * `true` - The delay elapsed; the request may go out
    /// * `false` - Cancellation was requested before or during the wait
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }

        if self.delay.is_zero() {
            return true;
        }

        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }
}
