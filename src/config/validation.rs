use crate::config::types::{Config, CrawlRequest, CrawlerConfig, RequestConfig};
use crate::{ConfigError, ConfigResult};
use reqwest::Method;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

impl CrawlRequest {
    /// Validates a configuration and a seed URL into a crawl request
    ///
    /// # Arguments
    ///
    /// * `seed` - The URL the crawl starts from
    /// * `config` - Loaded (or default) configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlRequest)` - Everything checks out
    /// * `Err(ConfigError)` - The first problem found
    pub fn from_config(seed: &str, config: &Config) -> ConfigResult<Self> {
        let seed = validate_seed(seed)?;
        let rate_limit = validate_crawler_config(&config.crawler)?;
        let http_method = validate_request_config(&config.request)?;

        if config.output.directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output directory cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            seed,
            max_depth: config.crawler.max_depth,
            rate_limit,
            user_agent: config.request.user_agent.clone(),
            max_links_per_page: config.crawler.max_links_per_page as usize,
            exclude_paths: clean_exclude_paths(&config.crawler.exclude_paths),
            http_method,
            timeout: Duration::from_secs(config.request.timeout_secs),
            output_directory: PathBuf::from(&config.output.directory),
        })
    }
}

/// Validates the seed URL: absolute, http(s), with a host
fn validate_seed(seed: &str) -> ConfigResult<Url> {
    let url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use the http or https scheme",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(url)
}

/// Validates crawler configuration and converts the rate limit
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<Duration> {
    // max_depth and max_links_per_page are unsigned, so no lower bound check needed

    Duration::try_from_secs_f64(config.rate_limit).map_err(|_| {
        ConfigError::Validation(format!(
            "rate_limit must be a non-negative number of seconds, got {}",
            config.rate_limit
        ))
    })
}

/// Validates request configuration and parses the HTTP method
fn validate_request_config(config: &RequestConfig) -> ConfigResult<Method> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    parse_method(&config.http_method)
}

/// Parses an HTTP method name, case-insensitively
fn parse_method(name: &str) -> ConfigResult<Method> {
    let upper = name.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(ConfigError::InvalidMethod("method cannot be empty".to_string()));
    }

    Method::from_bytes(upper.as_bytes()).map_err(|_| ConfigError::InvalidMethod(name.to_string()))
}

/// Trims exclusion prefixes and drops empty ones
///
/// An empty prefix would match every href.
fn clean_exclude_paths(paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
