//! Authentication for the GitHub API.

use secrecy::SecretString;

use crate::error::{Error, Result};

/// Environment variable read by [`Auth::auto`].
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Where the API token comes from.
#[derive(Debug, Clone)]
pub enum Auth {
    /// A token supplied directly.
    Token(SecretString),

    /// A token read from the named environment variable.
    EnvVar(String),
}

impl Auth {
    /// Read the token from `GITHUB_TOKEN`.
    #[must_use]
    pub fn auto() -> Self {
        Self::EnvVar(TOKEN_ENV_VAR.to_string())
    }

    /// Resolve the token.
    ///
    /// # Errors
    /// Returns [`Error::NoToken`] if the token is missing or blank.
    pub fn resolve(&self) -> Result<SecretString> {
        use secrecy::ExposeSecret;

        let token = match self {
            Self::Token(token) => token.clone(),
            Self::EnvVar(name) => std::env::var(name)
                .map(SecretString::from)
                .map_err(|_| Error::NoToken)?,
        };

        if token.expose_secret().trim().is_empty() {
            return Err(Error::NoToken);
        }
        Ok(token)
    }
}
