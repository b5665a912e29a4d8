//! Menu-Crawler main entry point
//!
//! This is the command-line interface for the restaurant menu harvester.

use anyhow::Context;
use clap::Parser;
use menu_crawler::artifact::CommandRenderer;
use menu_crawler::config::{load_config_or_default, validate, Config};
use menu_crawler::crawler::run_crawl;
use menu_crawler::output::{generate_markdown_summary, print_report};
use menu_crawler::seeds::{load_batch, resolve_batch_urls, resolve_start_urls};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Menu-Crawler: a restaurant menu harvester
///
/// Crawls each site from its home page, follows links that look like menu
/// content and stores every menu page as a PDF document or raw file under
/// the data directory.
#[derive(Parser, Debug)]
#[command(name = "menu-crawler")]
#[command(version)]
#[command(about = "A restaurant menu harvester", long_about = None)]
struct Cli {
    /// Starting URLs; invalid ones fall back to the configured default URL
    #[arg(value_name = "URL", conflicts_with = "db")]
    urls: Vec<String>,

    /// Crawl every website listed in the batch database instead
    #[arg(long)]
    db: bool,

    /// Batch database path (overrides the config file)
    #[arg(long, value_name = "PATH", requires = "db")]
    database: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving one folder per crawled site
    #[arg(long, value_name = "DIR")]
    data_root: Option<PathBuf>,

    /// Maximum number of fetches in flight
    #[arg(long, value_name = "N")]
    max_concurrent: Option<u32>,

    /// Write a markdown summary of all crawls to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let start_urls = if cli.db {
        let urls = load_batch(&config.batch).with_context(|| {
            format!(
                "Failed to read batch list from {}",
                config.batch.database_path.display()
            )
        })?;
        resolve_batch_urls(&urls, &config.crawler.default_url)
    } else {
        resolve_start_urls(&cli.urls, &config.crawler.default_url)
    };

    if start_urls.is_empty() {
        tracing::warn!(
            "Batch list in {} is empty, nothing to crawl",
            config.batch.database_path.display()
        );
        return Ok(());
    }

    tracing::info!(
        "Crawling {} site(s) into {} (max {} concurrent fetches)",
        start_urls.len(),
        config.crawler.data_root.display(),
        config.crawler.max_concurrent_pages
    );

    let renderer = Arc::new(CommandRenderer::from_config(&config.renderer));
    let reports = run_crawl(&config, &start_urls, renderer).await?;

    let mut failed = 0;
    for report in &reports {
        if !cli.quiet {
            print_report(report);
        }

        if report.is_success() {
            tracing::info!("Crawl of {} succeeded", report.home_url);
        } else {
            failed += 1;
            tracing::error!("Crawl of {} failed", report.home_url);
        }
    }

    if let Some(path) = &cli.summary {
        generate_markdown_summary(&reports, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    if failed > 0 {
        anyhow::bail!("{} of {} crawl(s) failed", failed, reports.len());
    }

    Ok(())
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }

    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(data_root) = &cli.data_root {
        config.crawler.data_root = data_root.clone();
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.crawler.max_concurrent_pages = max_concurrent;
    }
    if let Some(database) = &cli.database {
        config.batch.database_path = database.clone();
    }

    validate(&config).context("Invalid command-line overrides")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("menu_crawler=info,warn"),
            1 => EnvFilter::new("menu_crawler=debug,info"),
            2 => EnvFilter::new("menu_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
