//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Sending one request per page with the configured method
//! - Classifying failures
//!
//! There are no retries: a single attempt per URL is final.

use reqwest::{Client, Method};
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request did not complete in time
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    /// No connection could be established
    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    /// The response body could not be read or decoded
    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    /// Any other transport failure
    #[error("Request failed for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - User-Agent header sent with every request
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_harvest::crawler::build_http_client;
///
/// let client = build_http_client("sumi-harvest/0.1", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body
///
/// Redirects are followed transparently by the client. Any status outside the
/// 2xx range is a failure.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `method` - The HTTP method to send
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, method: &Method, url: &str) -> Result<String, FetchError> {
    let response = client
        .request(method.clone(), url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

/// Maps a transport error to a fetch error
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
