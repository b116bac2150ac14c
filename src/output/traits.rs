//! Output sink traits and error types
//!
//! This module defines the trait interface for record sinks and the
//! associated error types.

use crate::output::PageRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting a record
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize record for {url}: {source}")]
    Serialization {
        url: String,
        source: serde_json::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for page record sinks
///
/// The crawl engine calls `save` once per successfully fetched page. An error
/// only concerns that page; the engine logs and counts it and keeps crawling.
pub trait RecordSink: Send {
    /// Persists one page record
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the record was written
    /// * `Err(OutputError)` - The record could not be written
    fn save(&mut self, record: &PageRecord) -> OutputResult<PathBuf>;
}
