//! Configuration module for Menu-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the crawler also runs without a file.
//!
//! # Example
//!
//! ```no_run
//! use menu_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Artifacts go to: {}", config.crawler.data_root.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, ClassifierConfig, Config, CrawlerConfig, RendererConfig, UserAgentConfig,
    DEFAULT_MENU_KEYWORDS,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
