//! Error types for retest-core.

use thiserror::Error;

/// Result type alias using retest-core's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in retest-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The required label was not configured.
    #[error("required label is not set")]
    MissingRequiredLabel,

    /// The repository identity is missing.
    #[error("repository is not set (expected owner/name)")]
    MissingRepository,

    /// The repository identity could not be parsed.
    #[error("invalid repository '{0}' (expected owner/name)")]
    InvalidRepository(String),

    /// The failure state set is empty.
    #[error("at least one failure state must be configured")]
    NoFailureStates,

    /// Configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadConfig {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse config file {path}: {source}")]
    ParseConfig {
        /// Path of the file.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Enumerating pull requests failed. Aborts the sweep.
    #[error("failed to list pull requests: {0}")]
    ListPullRequests(#[source] Box<dyn std::error::Error + Send + Sync>),
}
