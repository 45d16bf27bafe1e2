//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text; `display_*` functions print it.

use console::style;

use crate::bump_set::BumpSetData;
use crate::outcome::{BranchOutcome, BranchReport, BumpReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// One report line: branch name and what happened to it.
pub fn format_branch_report(report: &BranchReport) -> String {
    format!("{}: {}", report.branch, report.outcome)
}

/// Trailing summary of a bump run.
pub fn format_summary(report: &BumpReport) -> String {
    format!(
        "{} branches processed, {} commits created, {} failed",
        report.branches.len(),
        report.commits().len(),
        report.failures().len()
    )
}

/// Print every branch outcome followed by the summary.
///
/// Failures go to stderr, skips are warnings, everything else is success.
pub fn display_bump_report(report: &BumpReport) {
    println!("\n{}", style("Bump results:").bold());
    for branch in &report.branches {
        let line = format_branch_report(branch);
        match branch.outcome {
            BranchOutcome::Failed(_) => display_error(&line),
            BranchOutcome::Unsupported { .. } => display_warning(&line),
            _ => display_success(&line),
        }
    }
    println!("\n{}", format_summary(report));
}

/// Show the catalog and the branches that will be visited.
pub fn display_bump_set(data: &BumpSetData) {
    let versions: Vec<String> = data.catalog.versions.iter().map(|v| v.to_string()).collect();
    println!(
        "\n{} {}",
        style("Release:").bold(),
        style(&data.catalog.release_name).cyan()
    );
    println!("  versions: {}", versions.join(", "));
    if data.catalog.is_semver {
        println!("  versioning: semantic");
    }
    println!("{}", style("Tile branches:").bold());
    for branch in &data.tile_branches {
        println!("  - {}", branch.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelslashError;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_format_branch_report() {
        let report = BranchReport {
            branch: "rel/2.5".to_string(),
            outcome: BranchOutcome::UpToDate {
                version: "75".to_string(),
            },
        };
        assert_eq!(
            format_branch_report(&report),
            "rel/2.5: already has the latest version (\"75\")"
        );
    }

    #[test]
    fn test_format_summary() {
        let mut report = BumpReport::default();
        report.push(
            "master",
            BranchOutcome::Bumped {
                from: "1".to_string(),
                to: "2".to_string(),
                commit: "abc".to_string(),
            },
        );
        report.push(
            "rel/1",
            BranchOutcome::Failed(RelslashError::lock("missing")),
        );
        assert_eq!(
            format_summary(&report),
            "2 branches processed, 1 commits created, 1 failed"
        );
    }
}
