//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching (one attempt per URL)
//! - HTML parsing and page record extraction
//! - The depth-first frontier and request pacing
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use extractor::{clean_text_elements, extract_page};
pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use parser::{parse_html, ParsedDocument};
pub use scheduler::{Frontier, PageFrame, RateLimiter};
