//! `retest run` command - Sweep pull requests and request retries.

use anyhow::{Context, Result};
use retest_core::{SweepMode, sweep};

use super::Settings;
use crate::host::GitHubHost;
use crate::output;

/// Run the sweep.
pub fn run(settings: &Settings, dry_run: bool) -> Result<()> {
    let config = &settings.config;
    let host = GitHubHost::new(settings.client()?, config.repository.clone());
    let mode = if dry_run {
        SweepMode::DryRun
    } else {
        SweepMode::Apply
    };

    output::info(&format!(
        "Sweeping {} for '{}' (max {} retries per check)",
        config.repository, config.required_label, config.max_retry
    ));
    if dry_run {
        output::warn("Dry run - no comments will be posted");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = rt
        .block_on(sweep(&host, config, mode))
        .context("Sweep aborted")?;

    let verb = if dry_run { "Would request" } else { "Requested" };
    output::success(&format!(
        "{verb} {} retest(s) across {} eligible of {} pull request(s)",
        report.retries_requested, report.eligible, report.pull_requests
    ));
    if report.exhausted > 0 {
        output::info(&format!(
            "{} failing check(s) already at the retry limit",
            report.exhausted
        ));
    }
    if report.skipped_pull_requests > 0 {
        output::warn(&format!(
            "{} pull request(s) skipped: statuses unavailable",
            report.skipped_pull_requests
        ));
    }
    if report.comment_failures > 0 {
        output::warn(&format!(
            "{} comment(s) could not be posted",
            report.comment_failures
        ));
    }

    Ok(())
}
