//! Error types for GitHub API operations.

use thiserror::Error;

/// Result type alias using retest-github's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to GitHub.
#[derive(Debug, Error)]
pub enum Error {
    /// No API token is available.
    #[error("GITHUB_TOKEN is not set")]
    NoToken,

    /// The token was rejected.
    #[error("GitHub authentication failed")]
    AuthenticationFailed,

    /// The API rate limit is exhausted.
    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    /// The resource does not exist or the token cannot see it.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("GitHub API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The token cannot be used in a header.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
