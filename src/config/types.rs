use reqwest::Method;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Main configuration structure for Sumi-Harvest
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed URL (the seed itself counts as one level)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Delay applied before every request (seconds)
    #[serde(rename = "rate-limit")]
    pub rate_limit: f64,

    /// Maximum number of internal links followed from a single page
    #[serde(rename = "max-links-per-page")]
    pub max_links_per_page: u32,

    /// Raw href prefixes that are never followed
    #[serde(rename = "exclude-paths")]
    pub exclude_paths: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            rate_limit: 1.0,
            max_links_per_page: 10,
            exclude_paths: Vec::new(),
        }
    }
}

/// HTTP request configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// HTTP method name used for every page request
    #[serde(rename = "http-method")]
    pub http_method: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_method: "GET".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory; records land in a per-domain subdirectory
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
        }
    }
}

/// A validated, immutable description of one crawl run
///
/// Built with [`CrawlRequest::from_config`], which rejects anything the crawl
/// engine could not honor.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// The URL the traversal starts from
    pub seed: Url,

    /// Depth budget of the seed; children get one less
    pub max_depth: u32,

    /// Fixed delay before each fetch
    pub rate_limit: Duration,

    /// User-Agent header value
    pub user_agent: String,

    /// Per-page cap on followed internal links
    pub max_links_per_page: usize,

    /// Raw href prefixes that are never followed (empty entries removed)
    pub exclude_paths: Vec<String>,

    /// HTTP method used for every fetch
    pub http_method: Method,

    /// Whole-request timeout
    pub timeout: Duration,

    /// Base output directory
    pub output_directory: PathBuf,
}
