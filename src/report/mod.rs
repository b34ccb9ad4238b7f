pub mod types;

pub use types::{IssueState, Report};

use crate::analysis::Analysis;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to render raw model response: {0}")]
    Render(#[from] serde_json::Error),
}

pub fn build(repo_url: &str, issue_number: u64, analysis: Analysis) -> Report {
    Report {
        repo_url: repo_url.to_string(),
        issue_number,
        analysis,
    }
}

/// Output the report to terminal (default) or to a markdown file.
#[instrument(skip(report), fields(repo_url = %report.repo_url, issue = report.issue_number))]
pub fn output(report: &Report, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report)
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, path)
        }
    }
}

/// Terminal layout:
///
/// Issue #7: "Login button does nothing"
/// State: OPEN | https://github.com/org/repo/issues/7
///
/// ═══ Summary ═══
/// ...
fn print_terminal_report(report: &Report) -> Result<(), ReportError> {
    println!();
    match &report.analysis {
        Analysis::Summarized(response) => {
            println!("Issue #{}: \"{}\"", report.issue_number, response.title);
            println!(
                "State: {} | {}",
                colorize_state(&response.state),
                response.url.underline()
            );
            println!();
            println!("═══ Summary ═══");
            if response.summary.is_empty() {
                println!("  (empty summary)");
            } else {
                println!("{}", response.summary);
            }
        }
        Analysis::Unusable(failure) => {
            println!("Issue #{} of {}", report.issue_number, report.repo_url);
            println!();
            println!("═══ {} ═══", "Analysis error".red().bold());
            println!("{}", failure.error);
            println!("Raw response:");
            println!("{}", serde_json::to_string_pretty(&failure.raw_response)?);
        }
    }
    println!();
    Ok(())
}

fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut md = String::new();
    match &report.analysis {
        Analysis::Summarized(response) => {
            md.push_str(&format!("# Issue #{}: \"{}\"\n\n", report.issue_number, response.title));
            md.push_str(&format!(
                "**State:** {} | **URL:** <{}>\n\n",
                response.state.to_uppercase(),
                response.url
            ));
            md.push_str("## Summary\n\n");
            md.push_str(&response.summary);
            md.push('\n');
        }
        Analysis::Unusable(failure) => {
            md.push_str(&format!("# Issue #{} of {}\n\n", report.issue_number, report.repo_url));
            md.push_str("## Analysis error\n\n");
            md.push_str(&format!("{}\n\n", failure.error));
            md.push_str("```json\n");
            md.push_str(&serde_json::to_string_pretty(&failure.raw_response)?);
            md.push_str("\n```\n");
        }
    }

    std::fs::write(path, md)?;
    Ok(())
}

fn colorize_state(state: &str) -> colored::ColoredString {
    let label = state.to_uppercase();
    match IssueState::from_api(state) {
        IssueState::Open => label.green().bold(),
        IssueState::Closed => label.red().bold(),
        IssueState::Other => label.yellow().bold(),
    }
}
