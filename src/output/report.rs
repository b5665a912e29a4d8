//! Crawl report for one starting URL

use crate::artifact::{Artifact, ArtifactKind};
use crate::state::PageState;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Where in a page's processing a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// Fetching the page itself
    Fetch,
    /// Saving a binary response or preparing the output folder
    Artifact,
    /// Converting the page to a document
    Render,
    /// Downloading or saving a menu image
    Image,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Artifact => "artifact",
            Self::Render => "render",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// A settled failure, attributed to the URL that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub url: String,
    pub stage: FailureStage,
    pub reason: String,
}

/// Final view of one visited page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub state: PageState,
    /// Menu links this page expanded, in discovery order
    pub frontier: Vec<String>,
    /// Size of the page's updated `seen` set
    pub seen_count: usize,
}

/// Outcome of crawling one site
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub home_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Final state of the home page
    pub root_state: PageState,
    pub pages: Vec<PageRecord>,
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<PageFailure>,
    /// Highest number of fetches that were in flight at once
    pub peak_concurrency: usize,
}

impl CrawlReport {
    /// A crawl succeeds when its home page completed; subtree failures are partial results
    pub fn is_success(&self) -> bool {
        self.root_state.is_success()
    }

    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    pub fn page(&self, url: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.url == url)
    }

    pub fn pages_in_state(&self, state: PageState) -> usize {
        self.pages.iter().filter(|p| p.state == state).count()
    }

    pub fn artifacts_of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }

    /// Failures recorded for `url`, at any stage
    pub fn failures_for<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a PageFailure> {
        self.failures.iter().filter(move |f| f.url == url)
    }
}

/// Prints a human-readable summary of a crawl to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl of {} ===\n", report.home_url);

    let status = if report.is_success() { "success" } else { "failed" };
    println!("Status: {} (home page {})", status, report.root_state);
    println!(
        "Duration: {:.1}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    println!("Peak concurrent fetches: {}", report.peak_concurrency);
    println!();

    println!("Pages ({}):", report.pages.len());
    for state in PageState::all_states() {
        let count = report.pages_in_state(state);
        if count > 0 {
            println!("  {}: {}", state, count);
        }
    }
    println!();

    println!("Artifacts ({}):", report.artifacts.len());
    for artifact in &report.artifacts {
        println!("  [{}] {}", artifact.kind, artifact.path.display());
    }
    println!();

    if !report.failures.is_empty() {
        println!("Failures ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  [{}] {}: {}", failure.stage, failure.url, failure.reason);
        }
        println!();
    }
}
