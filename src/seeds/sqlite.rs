//! Batch seed list stored in SQLite
//!
//! The list is any table readable by the configured query; the first column
//! of each row is one website. NULL and blank values are skipped.

use crate::config::BatchConfig;
use crate::CrawlError;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Reads the batch of starting URLs from the database at `path`
///
/// The database is opened read-only; a missing file is an error.
pub fn load_batch_urls(path: &Path, query: &str) -> Result<Vec<String>, CrawlError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let urls = query_urls(&conn, query)?;

    tracing::info!("Loaded {} starting URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// Reads the batch described by the `[batch]` config section
pub fn load_batch(config: &BatchConfig) -> Result<Vec<String>, CrawlError> {
    load_batch_urls(&config.database_path, &config.query)
}

fn query_urls(conn: &Connection, query: &str) -> Result<Vec<String>, CrawlError> {
    let mut stmt = conn.prepare(query)?;

    let urls = stmt
        .query_map([], |row| row.get::<_, Option<String>>(0))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();

    Ok(urls)
}
