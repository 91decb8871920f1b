//! Retry decisions for a single pull request.
//!
//! The engine is pure: given a PR snapshot, its commit statuses and its
//! comment history, it decides which failing checks get a retry. All state
//! lives in the comment history, so the same inputs always give the same
//! decisions and a sweep can be re-run after a crash.

use std::collections::HashSet;

use crate::config::Config;
use crate::model::{Comment, PullRequest, StatusCheck};

/// Why a PR was not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The PR is not open.
    NotOpen,
    /// The PR carries the exempt label.
    Exempt,
    /// The PR does not carry the required label.
    MissingRequiredLabel,
}

impl SkipReason {
    /// Short human-readable description.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::NotOpen => "not open",
            Self::Exempt => "exempt label present",
            Self::MissingRequiredLabel => "required label missing",
        }
    }
}

/// Comments to post for one failing check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAction {
    /// PR to comment on.
    pub pr_number: u64,

    /// Context of the failing check.
    pub context: String,

    /// 1-based number of this retry.
    pub attempt: u32,

    /// Counter token, posted first.
    pub counter_comment: String,

    /// Notice for the PR author, posted second.
    pub notice_comment: String,
}

/// Decision for one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckDecision {
    /// The check is not in a failing state.
    NotFailing {
        /// Check context.
        context: String,
    },
    /// The check failed and has budget left.
    Retry(RetryAction),
    /// The check failed but its retry budget is spent.
    Exhausted {
        /// Check context.
        context: String,
        /// Counter comments already present.
        attempts: u32,
    },
}

/// Result of evaluating a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The PR was gated out before looking at any check.
    Skipped(SkipReason),
    /// One decision per distinct check context, newest status first.
    Evaluated(Vec<CheckDecision>),
}

impl Evaluation {
    /// The retry actions to perform, in order.
    pub fn retry_actions(&self) -> impl Iterator<Item = &RetryAction> {
        let decisions: &[CheckDecision] = match self {
            Self::Skipped(_) => &[],
            Self::Evaluated(decisions) => decisions,
        };
        decisions.iter().filter_map(|d| match d {
            CheckDecision::Retry(action) => Some(action),
            _ => None,
        })
    }
}

/// The counter token for a check.
#[must_use]
pub fn retest_command(context: &str) -> String {
    format!("/retest {context}")
}

/// The notice addressed to the PR author.
#[must_use]
pub fn failure_notice(author: &str, context: &str, target_url: &str) -> String {
    format!("@{author} {context} test failed. Logs are available at {target_url} for debugging")
}

/// Count comments whose body is exactly `command`.
#[must_use]
pub fn count_retries(comments: &[Comment], command: &str) -> u32 {
    let count = comments.iter().filter(|c| c.body == command).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Decide whether a PR is eligible for evaluation at all.
///
/// Exemption is checked across the whole label set before the required label,
/// so a PR carrying both is always exempt.
#[must_use]
pub fn gate(pr: &PullRequest, config: &Config) -> Option<SkipReason> {
    if !pr.is_open() {
        return Some(SkipReason::NotOpen);
    }

    if let Some(exempt) = &config.exempt_label {
        if pr.has_label(exempt) {
            return Some(SkipReason::Exempt);
        }
    }

    if !pr.has_label(&config.required_label) {
        return Some(SkipReason::MissingRequiredLabel);
    }

    None
}

/// Evaluate every check on a PR's head commit.
///
/// `statuses` are expected newest first, as hosts list them; only the first
/// entry per context is considered.
#[must_use]
pub fn evaluate_pull_request(
    pr: &PullRequest,
    statuses: &[StatusCheck],
    comments: &[Comment],
    config: &Config,
) -> Evaluation {
    if let Some(reason) = gate(pr, config) {
        return Evaluation::Skipped(reason);
    }

    let decisions = latest_per_context(statuses)
        .map(|check| decide(pr, check, comments, config))
        .collect();

    Evaluation::Evaluated(decisions)
}

fn decide(
    pr: &PullRequest,
    check: &StatusCheck,
    comments: &[Comment],
    config: &Config,
) -> CheckDecision {
    if !config.failure_states.contains(&check.state) {
        return CheckDecision::NotFailing {
            context: check.context.clone(),
        };
    }

    let command = retest_command(&check.context);
    let attempts = count_retries(comments, &command);

    if attempts >= config.max_retry {
        return CheckDecision::Exhausted {
            context: check.context.clone(),
            attempts,
        };
    }

    CheckDecision::Retry(RetryAction {
        pr_number: pr.number,
        context: check.context.clone(),
        attempt: attempts + 1,
        notice_comment: failure_notice(&pr.author, &check.context, check.target_url_or_empty()),
        counter_comment: command,
    })
}

/// Yield the first status seen for each context, preserving order.
fn latest_per_context(statuses: &[StatusCheck]) -> impl Iterator<Item = &StatusCheck> {
    let mut seen = HashSet::new();
    statuses
        .iter()
        .filter(move |s| seen.insert(s.context.as_str()))
}
