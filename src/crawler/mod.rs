//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with distinct transport and status errors
//! - HTML parsing and link/image extraction
//! - The frontier and deduplication engine
//! - Admission control for concurrent fetches
//! - Recursive crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use coordinator::{crawl_site, run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, media_type, FetchError, FetchedResource};
pub use frontier::{spawn_children, Classification, FrontierEngine};
pub use parser::{discover, extract_images, extract_links, Discovered, ParsedPage, RawImage, RawLink};
pub use scheduler::{FetchPermit, Scheduler};
