//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal engine that ties the other parts together:
//! - Owning the visited set, the statistics and the frontier for one run
//! - Pacing, fetching, parsing, extracting and saving each page
//! - Filtering each page's anchors and descending into the accepted ones
//! - Stopping promptly when cancellation is requested
//!
//! Traversal is depth-first in document order: a page's first accepted link is
//! explored completely before its second accepted link is considered.

use crate::config::CrawlRequest;
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::{Frontier, PageFrame, RateLimiter};
use crate::output::{CrawlStats, JsonFileSink, RecordSink};
use crate::state::{PageState, VisitedSet};
use crate::url::{
    is_excluded, is_fetchable_href, is_http_url, is_internal, network_location, resolve_href,
    NetworkLocation,
};
use crate::{ConfigError, Result, UrlError};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What a finished (or stopped) crawl run produced
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Final counters
    pub stats: CrawlStats,

    /// Every dispatched URL with its final state
    pub visited: VisitedSet,

    /// Whether a stop was requested during the run
    pub cancelled: bool,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    request: CrawlRequest,
    client: Client,
    sink: Box<dyn RecordSink>,
    origin: NetworkLocation,
    limiter: RateLimiter,
    visited: VisitedSet,
    stats: CrawlStats,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator writing JSON records under the request's output directory
    ///
    /// # Arguments
    ///
    /// * `request` - The validated crawl request
    /// * `cancel` - Token that stops the run when cancelled
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The output directory or HTTP client could not be set up
    pub fn new(request: CrawlRequest, cancel: CancellationToken) -> Result<Self> {
        let origin = origin_of(&request.seed)?;
        let sink = JsonFileSink::create(&request.output_directory, &origin).map_err(|source| {
            ConfigError::OutputDirectory {
                path: request.output_directory.display().to_string(),
                source,
            }
        })?;
        tracing::info!("Writing records to {}", sink.directory().display());

        Self::with_sink(request, Box::new(sink), cancel)
    }

    /// Creates a coordinator writing records to the given sink
    pub fn with_sink(
        request: CrawlRequest,
        sink: Box<dyn RecordSink>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let origin = origin_of(&request.seed)?;
        let client = build_http_client(&request.user_agent, request.timeout)?;
        let limiter = RateLimiter::new(request.rate_limit);

        Ok(Self {
            request,
            client,
            sink,
            origin,
            limiter,
            visited: VisitedSet::new(),
            stats: CrawlStats::new(),
            cancel,
        })
    }

    /// Runs the crawl to completion or until cancelled
    ///
    /// Individual page failures never end the run; they are counted in the
    /// returned statistics.
    pub async fn run(mut self) -> CrawlOutcome {
        tracing::info!(
            "Starting crawl of {} (max depth {}, max {} links per page, {:?} delay)",
            self.request.seed,
            self.request.max_depth,
            self.request.max_links_per_page,
            self.limiter.delay()
        );

        let mut frontier = Frontier::new();
        let seed = self.request.seed.clone();
        if let Some(frame) = self.visit(seed, self.request.max_depth).await {
            frontier.push(frame);
        }

        while let Some(frame) = frontier.top_mut() {
            if self.cancel.is_cancelled() {
                break;
            }

            let Some(href) = frame.next_anchor() else {
                if let Some(done) = frontier.pop() {
                    self.finish_page(&done);
                }
                continue;
            };

            let Some(child) = self.select_link(frame, &href) else {
                continue;
            };
            frame.record_followed(&child);
            let depth = frame.child_depth();

            if let Some(child_frame) = self.visit(child, depth).await {
                frontier.push(child_frame);
            }
        }

        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            tracing::warn!(
                "Stop requested, halting with {} pages still being walked",
                frontier.len()
            );
            // links already followed from unfinished pages still count
            while let Some(frame) = frontier.pop() {
                self.stats.record_links(frame.followed());
            }
        }

        tracing::info!(
            "Crawl finished: {} pages crawled, {} links found, {} errors",
            self.stats.pages_crawled,
            self.stats.links_found,
            self.stats.errors
        );

        CrawlOutcome {
            stats: self.stats,
            visited: self.visited,
            cancelled,
        }
    }

    /// Enters a URL with the given depth budget
    ///
    /// Returns a frame for the page's anchors when the page was fetched.
    async fn visit(&mut self, url: Url, depth: u32) -> Option<PageFrame> {
        if depth == 0 {
            tracing::trace!("Depth exhausted at {}", url);
            return None;
        }

        if self.visited.contains(url.as_str()) {
            return None;
        }

        if !self.limiter.wait(&self.cancel).await {
            return None;
        }

        if !self.visited.dispatch(url.as_str()) {
            return None;
        }
        tracing::info!("Crawling: {}", url);

        let body = match fetch_page(&self.client, &self.request.http_method, url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Error fetching {}: {}", url, e);
                self.visited.complete(url.as_str(), PageState::Failed);
                self.stats.record_error();
                return None;
            }
        };

        self.visited.complete(url.as_str(), PageState::Succeeded);
        self.stats.record_page();

        let document = parse_html(&body);
        let record = extract_page(&url, &document);
        if let Err(e) = self.sink.save(&record) {
            tracing::error!("Failed to save record for {}: {}", url, e);
            self.stats.record_save_error();
        }

        Some(PageFrame::new(url, depth, document.anchors))
    }

    /// Decides whether an anchor of `frame` is followed
    ///
    /// Returns the absolute URL to descend into, or `None` when the href is a
    /// pseudo-protocol, excluded, unresolvable, external, over the page's
    /// link cap, or already visited.
    fn select_link(&self, frame: &PageFrame, href: &str) -> Option<Url> {
        if !is_fetchable_href(href) {
            tracing::debug!("Skipping non-fetchable href {}", href);
            return None;
        }

        if is_excluded(href, &self.request.exclude_paths) {
            tracing::debug!("Skipping excluded href {}", href);
            return None;
        }

        let url = match resolve_href(&frame.url, href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping href: {}", e);
                return None;
            }
        };

        if !is_http_url(&url) || !is_internal(&self.origin, &url) {
            tracing::trace!("Skipping external link {}", url);
            return None;
        }

        if !frame.can_follow(self.request.max_links_per_page) {
            tracing::trace!("Link cap reached on {}, skipping {}", frame.url, url);
            return None;
        }

        if self.visited.contains(url.as_str()) || frame.has_followed(url.as_str()) {
            tracing::debug!("Already visited {}", url);
            return None;
        }

        Some(url)
    }

    /// Books a page whose anchors are exhausted
    fn finish_page(&mut self, frame: &PageFrame) {
        self.stats.record_links(frame.followed());
        tracing::info!(
            "Progress: {} pages crawled, {} links found, {} errors.",
            self.stats.pages_crawled,
            self.stats.links_found,
            self.stats.errors
        );
    }
}

/// Network location of the seed, which defines "internal"
fn origin_of(seed: &Url) -> Result<NetworkLocation> {
    network_location(seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()).into())
}

/// Runs a complete crawl writing JSON records
///
/// # Arguments
///
/// * `request` - The validated crawl request
/// * `cancel` - Token that stops the run when cancelled
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The traversal ran (page failures are counted, not returned)
/// * `Err(HarvestError)` - Setup failed before any page was fetched
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::config::{Config, CrawlRequest};
/// use sumi_harvest::crawler::run_crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = CrawlRequest::from_config("https://example.com/", &Config::default())?;
/// let outcome = run_crawl(request, CancellationToken::new()).await?;
/// println!("{} pages", outcome.stats.pages_crawled);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    request: CrawlRequest,
    cancel: CancellationToken,
) -> Result<CrawlOutcome> {
    let coordinator = Coordinator::new(request, cancel)?;
    Ok(coordinator.run().await)
}
