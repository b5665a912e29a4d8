//! URL handling module for Menu-Crawler
//!
//! This module provides URL normalization, starting-URL validation, relative
//! link resolution, and the menu classifier that decides which links to expand.
//!
//! All functions work on plain strings: scraped links are frequently not valid
//! URLs, and a bad link must fall out as "not expandable" instead of an error.

mod classify;
mod normalize;
mod resolve;

// Re-export main functions
pub use classify::{is_expandable, site_name, KeywordClassifier, LinkClassifier};
pub use normalize::{encode_non_ascii, is_valid_url, normalize};
pub use resolve::{resolve_href, url_scheme};
