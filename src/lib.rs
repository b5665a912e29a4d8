//! Menu-Crawler: a restaurant menu harvester
//!
//! This crate crawls a single website from its home page, follows the links that
//! look like menu content, and stores every terminal page as an artifact: a
//! rendered PDF document or the raw bytes of a binary file such as an image.

pub mod artifact;
pub mod config;
pub mod crawler;
pub mod output;
pub mod seeds;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Menu-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Batch database error: {0}")]
    Batch(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reported by a document renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Renderer exited with {status}")]
    Failed { status: String },

    #[error("Renderer timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Renderer produced no output at {0}")]
    MissingOutput(String),

    #[error("Renderer session already torn down")]
    Closed,
}

/// Result type alias for Menu-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_site, Coordinator};
pub use output::CrawlReport;
pub use state::{Page, PageState};
pub use url::{is_expandable, normalize, resolve_href};
