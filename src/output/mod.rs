//! Output module for crawl reports and summaries
//!
//! This module handles:
//! - The per-site crawl report with page records, artifacts and failures
//! - Printing a summary to stdout
//! - Writing a markdown summary file

mod markdown;
mod report;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{print_report, CrawlReport, FailureStage, PageFailure, PageRecord};
