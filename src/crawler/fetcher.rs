//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - GET requests that read the full body
//! - Error classification: transport failures, timeouts, non-2xx statuses

use crate::config::UserAgentConfig;
use crate::CrawlError;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use thiserror::Error;

/// Connection timeout applied regardless of the per-fetch timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully received HTTP response
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Media type of the `Content-Type` header, lowercased, parameters dropped
    pub content_type: Option<String>,
    /// Response body
    pub body: Vec<u8>,
}

/// Reasons a fetch did not produce a usable response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// DNS failure, refused connection, broken body stream, ...
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    /// The server answered with a non-2xx status
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Timeout { url } | Self::Status { url, .. } => url,
        }
    }
}

impl From<FetchError> for CrawlError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Transport { url, message } => CrawlError::Transport { url, message },
            FetchError::Timeout { url } => CrawlError::Timeout { url },
            FetchError::Status { url, status } => CrawlError::Status { url, status },
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout covering headers and body, if any
///
/// # Example
///
/// ```no_run
/// use menu_crawler::config::UserAgentConfig;
/// use menu_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Some(Duration::from_secs(30))).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Fetches a URL and reads the whole body
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedResource)` |
/// | Any other status | `FetchError::Status` |
/// | Timeout (headers or body) | `FetchError::Timeout` |
/// | Connect/DNS/body stream failure | `FetchError::Transport` |
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedResource, FetchError> {
    let response = client
        .get(url)
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

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(media_type);

    let body = response
        .bytes()
        .await
        .map_err(|e| classify_error(url, e))?;

    Ok(FetchedResource {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body: body.to_vec(),
    })
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Returns the media type of a `Content-Type` value (`"Image/PNG; q=1"` → `"image/png"`)
pub fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
