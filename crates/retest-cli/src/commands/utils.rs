use anyhow::{Context, Result, bail};
use retest_core::{Config, PartialConfig};
use retest_github::{Auth, GitHubClient};

use super::ConfigArgs;

/// Everything a command needs, resolved once at startup.
#[derive(Debug)]
pub struct Settings {
    pub config: Config,
    pub auth: Auth,
    pub api_url: String,
}

impl Settings {
    /// Resolve flags, environment and the optional config file.
    ///
    /// Fails on a missing required label, repository or token, or an
    /// unparseable retry limit.
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => PartialConfig::load(path)?,
            None => PartialConfig::default(),
        };

        let flags = PartialConfig {
            required_label: args.required_label.clone(),
            exempt_label: args.exempt_label.clone(),
            max_retry: parse_max_retry(args.max_retry.as_deref())?,
            repository: args.repository.clone(),
            failure_states: args.failure_states.clone(),
        };

        let config = flags.or(file).build()?;

        let auth = Auth::auto();
        auth.resolve()?;

        Ok(Self {
            config,
            auth,
            api_url: resolve_api_url(args.api_url.as_deref()),
        })
    }

    /// Build an authenticated client for the configured API URL.
    pub fn client(&self) -> Result<GitHubClient> {
        GitHubClient::with_base_url(&self.auth, &self.api_url)
            .context("Failed to authenticate with GitHub")
    }
}

/// Parse the retry limit. Blank means unset.
fn parse_max_retry(raw: Option<&str>) -> Result<Option<u32>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<u32>() {
        Ok(n) => Ok(Some(n)),
        Err(_) => bail!("maxretry {raw:?} is not valid"),
    }
}

/// API base URL to use. Blank means the public GitHub API.
fn resolve_api_url(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(GitHubClient::DEFAULT_API_URL)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_retry() {
        assert_eq!(parse_max_retry(None).unwrap(), None);
        assert_eq!(parse_max_retry(Some("")).unwrap(), None);
        assert_eq!(parse_max_retry(Some(" 4 ")).unwrap(), Some(4));
        assert_eq!(parse_max_retry(Some("0")).unwrap(), Some(0));
    }

    #[test]
    fn test_parse_max_retry_rejects_garbage() {
        for raw in ["three", "-1", "2.5"] {
            let err = parse_max_retry(Some(raw)).unwrap_err();
            assert!(err.to_string().contains("is not valid"));
        }
    }

    #[test]
    fn test_blank_api_url_uses_default() {
        for raw in [None, Some(""), Some("   ")] {
            assert_eq!(resolve_api_url(raw), "https://api.github.com");
        }
    }

    #[test]
    fn test_api_url_override_is_kept() {
        assert_eq!(
            resolve_api_url(Some(" https://ghe.example.com/api/v3 ")),
            "https://ghe.example.com/api/v3"
        );
    }
}
