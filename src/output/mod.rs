//! Output module for page records and crawl statistics
//!
//! This module handles:
//! - The persisted per-page record format
//! - Writing records to content-addressed JSON files
//! - Recording and printing crawl statistics

mod json_output;
pub mod stats;
mod traits;

pub use json_output::{content_hash, JsonFileSink};
pub use stats::{print_statistics, CrawlStats};
pub use traits::{OutputError, OutputResult, RecordSink};

use serde::{Deserialize, Serialize};

/// Title used when a page has no title element
pub const UNTITLED: &str = "Untitled";

/// The record persisted for every successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub metadata: PageMetadata,

    /// Non-empty trimmed text nodes, in document order
    pub text_elements: Vec<String>,

    /// Absolute image URLs, in document order
    pub image_links: Vec<String>,
}

/// Identifying information for a page record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub url: String,
    pub title: String,
}
