//! Configuration module for Sumi-Harvest
//!
//! This module handles loading and parsing TOML configuration files, and turning
//! a configuration plus a seed URL into a validated [`CrawlRequest`].
//!
//! # Example
//!
//! ```no_run
//! use sumi_harvest::config::{load_config, CrawlRequest};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! let request = CrawlRequest::from_config("https://example.com/", &config).unwrap();
//! println!("Crawler will use max depth: {}", request.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlRequest, CrawlerConfig, OutputConfig, RequestConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
