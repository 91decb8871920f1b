//! # retest-core
//!
//! Core library for retest: the retry engine that decides which failing
//! CI checks on a labeled pull request get a `/retest` comment, the
//! configuration it runs under, and the sweep that drives it against a
//! code host.

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod model;
pub mod sweep;

pub use config::{Config, FailureStates, PartialConfig, RepoSlug};
pub use engine::{
    CheckDecision, Evaluation, RetryAction, SkipReason, evaluate_pull_request, failure_notice,
    retest_command,
};
pub use error::{Error, Result};
pub use host::RepoHost;
pub use model::{Comment, PullRequest, PullRequestState, StatusCheck};
pub use sweep::{SweepMode, SweepReport, sweep};
