//! Snapshot types the retry engine works on.
//!
//! These are host-agnostic: the GitHub client maps its wire records into
//! them, and tests build them directly.

/// A pull request as seen at the start of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number.
    pub number: u64,

    /// PR title. Empty when the host did not report one.
    pub title: String,

    /// PR state.
    pub state: PullRequestState,

    /// Label names attached to the PR.
    pub labels: Vec<String>,

    /// SHA of the head commit.
    pub head_sha: String,

    /// Login of the PR author.
    pub author: String,
}

impl PullRequest {
    /// Check if the PR is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == PullRequestState::Open
    }

    /// Check if the PR carries `label`, ignoring case.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| labels_match(l, label))
    }
}

/// State of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    /// PR is open.
    Open,
    /// PR is closed (merged or not).
    Closed,
}

/// A commit status reported by an external CI system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheck {
    /// Name of the check, unique per commit.
    pub context: String,

    /// Raw state string as reported by the host (`failure`, `success`, ...).
    pub state: String,

    /// Link to the check's logs.
    pub target_url: Option<String>,
}

impl StatusCheck {
    /// Target URL, or an empty string when none was reported.
    #[must_use]
    pub fn target_url_or_empty(&self) -> &str {
        self.target_url.as_deref().unwrap_or_default()
    }
}

/// A comment on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment body.
    pub body: String,
}

impl Comment {
    /// Create a comment with the given body.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// Case-insensitive label comparison.
#[must_use]
pub fn labels_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
