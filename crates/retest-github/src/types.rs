//! GitHub API types.

use serde::{Deserialize, Serialize};

/// A GitHub Pull Request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number.
    pub number: u64,

    /// PR title.
    pub title: String,

    /// PR state.
    pub state: PullRequestState,

    /// Label names.
    pub labels: Vec<String>,

    /// SHA of the head commit.
    pub head_sha: String,

    /// Login of the author.
    pub author: String,
}

/// State of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// PR is open.
    Open,
    /// PR is closed.
    Closed,
}

/// A commit status posted by an external CI system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitStatus {
    /// Status context (check name).
    #[serde(default)]
    pub context: String,

    /// `error`, `failure`, `pending` or `success`.
    pub state: String,

    /// Link to the CI run.
    #[serde(default)]
    pub target_url: Option<String>,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    /// Comment body.
    pub body: Option<String>,
}

/// Request to create an issue/PR comment.
#[derive(Debug, Serialize)]
pub struct CreateComment {
    /// Comment body.
    pub body: String,
}

/// Basic repository metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// `owner/name`.
    pub full_name: String,

    /// Whether the repository is archived (comments will be rejected).
    #[serde(default)]
    pub archived: bool,

    /// Token permissions on the repository, when GitHub reports them.
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

/// Permissions of the authenticated token on a repository.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Permissions {
    /// Can write.
    #[serde(default)]
    pub push: bool,
}

/// Pull request as returned by the list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiPullRequest {
    number: u64,
    title: Option<String>,
    state: String,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    head: ApiCommitRef,
    user: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiCommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(api_pr: ApiPullRequest) -> Self {
        Self {
            number: api_pr.number,
            title: api_pr.title.unwrap_or_default(),
            state: match api_pr.state.as_str() {
                "open" => PullRequestState::Open,
                _ => PullRequestState::Closed,
            },
            labels: api_pr.labels.into_iter().map(|l| l.name).collect(),
            head_sha: api_pr.head.sha,
            author: api_pr.user.map(|u| u.login).unwrap_or_default(),
        }
    }
}
