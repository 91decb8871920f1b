//! One pass over a repository's pull requests.
//!
//! This module contains the core logic for `retest run`: list the open PRs,
//! gate them on labels, evaluate their checks and post retry comments.
//! Only a failure to list pull requests aborts; everything else is logged
//! and the sweep moves on.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{self, CheckDecision, Evaluation, RetryAction};
use crate::error::{Error, Result};
use crate::host::RepoHost;
use crate::model::PullRequest;

/// Whether the sweep posts comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepMode {
    /// Post retry comments.
    #[default]
    Apply,
    /// Log what would be posted without creating comments.
    DryRun,
}

/// Tally of what a sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Pull requests returned by the host.
    pub pull_requests: usize,

    /// Pull requests that passed the label gate.
    pub eligible: usize,

    /// Eligible pull requests skipped because their statuses could not be listed.
    pub skipped_pull_requests: usize,

    /// Retries requested (or planned, in dry-run mode).
    pub retries_requested: usize,

    /// Failing checks whose retry budget was already spent.
    pub exhausted: usize,

    /// Comment creations that failed.
    pub comment_failures: usize,
}

/// Run a sweep against `host`.
///
/// # Errors
/// Returns [`Error::ListPullRequests`] if the pull requests cannot be listed.
pub async fn sweep<H: RepoHost>(host: &H, config: &Config, mode: SweepMode) -> Result<SweepReport> {
    let prs = host
        .list_pull_requests()
        .await
        .map_err(|e| Error::ListPullRequests(Box::new(e)))?;

    let mut report = SweepReport {
        pull_requests: prs.len(),
        ..SweepReport::default()
    };

    for pr in &prs {
        if let Some(reason) = engine::gate(pr, config) {
            debug!(pr = pr.number, reason = reason.describe(), "skipping pull request");
            continue;
        }

        info!(pr = pr.number, title = %pr.title, "checking statuses");
        report.eligible += 1;
        process_pull_request(host, pr, config, mode, &mut report).await;
    }

    Ok(report)
}

async fn process_pull_request<H: RepoHost>(
    host: &H,
    pr: &PullRequest,
    config: &Config,
    mode: SweepMode,
    report: &mut SweepReport,
) {
    let statuses = match host.list_statuses(&pr.head_sha).await {
        Ok(statuses) => statuses,
        Err(e) => {
            warn!(pr = pr.number, error = %e, "failed to list statuses");
            report.skipped_pull_requests += 1;
            return;
        }
    };

    // An empty history under-counts retries; that is accepted over skipping.
    let comments = host.list_comments(pr.number).await.unwrap_or_else(|e| {
        warn!(pr = pr.number, error = %e, "failed to list comments");
        Vec::new()
    });

    let Evaluation::Evaluated(decisions) =
        engine::evaluate_pull_request(pr, &statuses, &comments, config)
    else {
        return;
    };

    for decision in decisions {
        match decision {
            CheckDecision::NotFailing { context } => {
                debug!(pr = pr.number, context = %context, "check not failing");
            }
            CheckDecision::Exhausted { context, attempts } => {
                info!(
                    pr = pr.number,
                    context = %context,
                    attempts,
                    "reached maximum attempts, skipping retest"
                );
                report.exhausted += 1;
            }
            CheckDecision::Retry(action) => {
                info!(
                    pr = pr.number,
                    context = %action.context,
                    attempt = action.attempt,
                    remaining = config.max_retry - action.attempt,
                    "requesting retest"
                );
                report.retries_requested += 1;
                if mode == SweepMode::Apply {
                    report.comment_failures += post_retry(host, &action).await;
                }
            }
        }
    }
}

/// Post both comments of a retry. Returns the number of failed creations.
///
/// The two posts are independent: a failed counter comment does not stop the
/// notice, and a failed notice does not undo the counter.
async fn post_retry<H: RepoHost>(host: &H, action: &RetryAction) -> usize {
    let mut failures = 0;

    for body in [&action.counter_comment, &action.notice_comment] {
        if let Err(e) = host.create_comment(action.pr_number, body).await {
            warn!(pr = action.pr_number, context = %action.context, error = %e, "failed to create comment");
            failures += 1;
        }
    }

    failures
}
