//! Starting URLs for a crawl
//!
//! URLs come from the command line or from a batch list in SQLite. Invalid
//! ones are replaced by the configured default URL.

mod sqlite;

pub use sqlite::{load_batch, load_batch_urls};

use crate::url::{is_valid_url, normalize};

/// Resolves the raw starting URLs into the list of sites to crawl
///
/// No URLs at all yields the default URL; every invalid URL is replaced by
/// the default. Results are normalized and keep their input order.
///
/// # Examples
///
/// ```
/// use menu_crawler::seeds::resolve_start_urls;
///
/// let default = "http://www.santori.com.ua/";
/// assert_eq!(resolve_start_urls(&[], default), vec![default]);
/// assert_eq!(
///     resolve_start_urls(&["orlypark.com.ua".to_string(), "not a url".to_string()], default),
///     vec!["http://orlypark.com.ua/", default]
/// );
/// ```
pub fn resolve_start_urls(raw: &[String], default_url: &str) -> Vec<String> {
    if raw.is_empty() {
        return vec![normalize(default_url)];
    }

    replace_invalid(raw, default_url)
}

/// Resolves the URLs read from a batch list
///
/// Unlike [`resolve_start_urls`], an empty batch stays empty: there is
/// nothing to crawl. Invalid entries are still replaced by the default.
///
/// # Examples
///
/// ```
/// use menu_crawler::seeds::resolve_batch_urls;
///
/// let default = "http://www.santori.com.ua/";
/// assert!(resolve_batch_urls(&[], default).is_empty());
/// assert_eq!(
///     resolve_batch_urls(&["orlypark.com.ua".to_string()], default),
///     vec!["http://orlypark.com.ua/"]
/// );
/// ```
pub fn resolve_batch_urls(batch: &[String], default_url: &str) -> Vec<String> {
    replace_invalid(batch, default_url)
}

fn replace_invalid(raw: &[String], default_url: &str) -> Vec<String> {
    raw.iter()
        .map(|url| {
            let url = url.trim();
            if is_valid_url(url) {
                normalize(url)
            } else {
                tracing::warn!("Invalid URL '{}', using {}", url, default_url);
                normalize(default_url)
            }
        })
        .collect()
}
