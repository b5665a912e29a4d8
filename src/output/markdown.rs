//! Markdown summary generation
//!
//! Renders one or more crawl reports as a markdown document: per-site status,
//! page state breakdown, artifacts written and failures.

use crate::output::report::CrawlReport;
use crate::state::PageState;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes a markdown summary of `reports` to `output_path`
pub fn generate_markdown_summary(reports: &[CrawlReport], output_path: &Path) -> io::Result<()> {
    let markdown = format_markdown_summary(reports);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats crawl reports as markdown
pub fn format_markdown_summary(reports: &[CrawlReport]) -> String {
    let mut md = String::new();

    md.push_str("# Menu Crawl Summary\n\n");

    let succeeded = reports.iter().filter(|r| r.is_success()).count();
    md.push_str(&format!(
        "- **Sites**: {} ({} succeeded, {} failed)\n",
        reports.len(),
        succeeded,
        reports.len() - succeeded
    ));
    md.push_str(&format!(
        "- **Artifacts**: {}\n\n",
        reports.iter().map(|r| r.artifacts.len()).sum::<usize>()
    ));

    for report in reports {
        format_site(&mut md, report);
    }

    md
}

fn format_site(md: &mut String, report: &CrawlReport) {
    md.push_str(&format!("## {}\n\n", report.home_url));

    let status = if report.is_success() { "success" } else { "failed" };
    md.push_str(&format!("- **Status**: {}\n", status));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.duration().num_milliseconds() as f64 / 1000.0
    ));
    md.push_str(&format!(
        "- **Peak Concurrent Fetches**: {}\n\n",
        report.peak_concurrency
    ));

    md.push_str("| State | Pages |\n");
    md.push_str("|-------|-------|\n");
    for state in [PageState::Completed, PageState::Failed] {
        md.push_str(&format!("| {} | {} |\n", state, report.pages_in_state(state)));
    }
    md.push('\n');

    if !report.artifacts.is_empty() {
        md.push_str("### Artifacts\n\n");
        md.push_str("| Kind | File | Source |\n");
        md.push_str("|------|------|--------|\n");
        for artifact in &report.artifacts {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                artifact.kind,
                artifact.path.display(),
                artifact.source_url
            ));
        }
        md.push('\n');
    }

    if !report.failures.is_empty() {
        md.push_str("### Failures\n\n");
        for failure in &report.failures {
            md.push_str(&format!(
                "- `{}` ({}): {}\n",
                failure.url, failure.stage, failure.reason
            ));
        }
        md.push('\n');
    }
}
