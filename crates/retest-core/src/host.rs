//! The code-hosting collaborator a sweep talks to.

use crate::model::{Comment, PullRequest, StatusCheck};

/// Source of pull requests, commit statuses and comments for one repository.
///
/// Calls are made one at a time; implementations need not be `Sync`.
#[allow(async_fn_in_trait)]
pub trait RepoHost {
    /// Error returned by every operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// List the repository's pull requests.
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, Self::Error>;

    /// List statuses for a commit, newest first.
    async fn list_statuses(&self, commit_sha: &str) -> Result<Vec<StatusCheck>, Self::Error>;

    /// List comments on a pull request.
    async fn list_comments(&self, pr_number: u64) -> Result<Vec<Comment>, Self::Error>;

    /// Append a comment to a pull request.
    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<(), Self::Error>;
}
