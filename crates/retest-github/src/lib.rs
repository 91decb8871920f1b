//! # retest-github
//!
//! GitHub API integration for retest: listing pull requests, commit
//! statuses and comments, and posting comments.

mod auth;
mod client;
mod error;
mod types;

pub use auth::{Auth, TOKEN_ENV_VAR};
pub use client::GitHubClient;
pub use error::{Error, Result};
pub use types::{
    CommitStatus, CreateComment, IssueComment, Permissions, PullRequest, PullRequestState,
    Repository,
};
