//! Configuration for a retest sweep.
//!
//! A [`Config`] is assembled once at startup from [`PartialConfig`] layers
//! (command line and environment over an optional TOML file over defaults)
//! and then passed by reference into the engine.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Retry budget used when none is configured.
pub const DEFAULT_MAX_RETRY: u32 = 3;

/// Status states treated as failing when none are configured.
pub const DEFAULT_FAILURE_STATES: &[&str] = &["failure", "error"];

/// Validated configuration for a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Label a PR must carry to be considered at all.
    pub required_label: String,

    /// Label that exempts a PR from retries, taking precedence over
    /// `required_label`.
    pub exempt_label: Option<String>,

    /// Maximum number of retry commands per (PR, check) pair.
    pub max_retry: u32,

    /// Repository to sweep.
    pub repository: RepoSlug,

    /// Status states that trigger a retry.
    pub failure_states: FailureStates,
}

impl Config {
    /// Create a config with default exempt label, budget and failure states.
    ///
    /// # Errors
    /// Returns [`Error::MissingRequiredLabel`] if `required_label` is blank.
    pub fn new(required_label: impl Into<String>, repository: RepoSlug) -> Result<Self> {
        let required_label = required_label.into();
        if required_label.trim().is_empty() {
            return Err(Error::MissingRequiredLabel);
        }

        Ok(Self {
            required_label,
            exempt_label: None,
            max_retry: DEFAULT_MAX_RETRY,
            repository,
            failure_states: FailureStates::default(),
        })
    }

    /// Set the exempt label. Blank labels clear it.
    #[must_use]
    pub fn with_exempt_label(mut self, label: impl Into<String>) -> Self {
        self.exempt_label = non_blank(Some(label.into()));
        self
    }

    /// Set the retry budget.
    #[must_use]
    pub const fn with_max_retry(mut self, max_retry: u32) -> Self {
        self.max_retry = max_retry;
        self
    }

    /// Set the failing state vocabulary.
    #[must_use]
    pub fn with_failure_states(mut self, states: FailureStates) -> Self {
        self.failure_states = states;
        self
    }
}

/// One layer of not-yet-validated configuration values.
///
/// Blank strings count as unset, matching how CI runners pass empty inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    /// Label a PR must carry.
    pub required_label: Option<String>,

    /// Label that exempts a PR.
    pub exempt_label: Option<String>,

    /// Retry budget.
    pub max_retry: Option<u32>,

    /// Repository as `owner/name`.
    pub repository: Option<String>,

    /// Failing state names.
    pub failure_states: Option<Vec<String>>,
}

impl PartialConfig {
    /// Load a layer from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| Error::ParseConfig {
            path: path.display().to_string(),
            source,
        })
    }

    /// Fill every unset value in `self` from `lower`.
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        Self {
            required_label: non_blank(self.required_label).or(lower.required_label),
            exempt_label: non_blank(self.exempt_label).or(lower.exempt_label),
            max_retry: self.max_retry.or(lower.max_retry),
            repository: non_blank(self.repository).or(lower.repository),
            failure_states: self
                .failure_states
                .filter(|s| s.iter().any(|s| !s.trim().is_empty()))
                .or(lower.failure_states),
        }
    }

    /// Validate the layer into a [`Config`], applying defaults.
    ///
    /// Checks run in a fixed order: required label, then repository, then
    /// failure states.
    ///
    /// # Errors
    /// Returns error if a mandatory value is missing or malformed.
    pub fn build(self) -> Result<Config> {
        let required_label = non_blank(self.required_label).ok_or(Error::MissingRequiredLabel)?;
        let repository = non_blank(self.repository)
            .ok_or(Error::MissingRepository)?
            .parse::<RepoSlug>()?;

        let failure_states = match self.failure_states {
            Some(states) => FailureStates::new(states)?,
            None => FailureStates::default(),
        };

        let mut config = Config::new(required_label, repository)?
            .with_max_retry(self.max_retry.unwrap_or(DEFAULT_MAX_RETRY))
            .with_failure_states(failure_states);
        config.exempt_label = non_blank(self.exempt_label);

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A repository identity in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// Parse an `owner/name` string.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRepository`] unless the input is exactly two
    /// non-empty segments separated by a single `/`.
    pub fn parse(slug: &str) -> Result<Self> {
        let invalid = || Error::InvalidRepository(slug.to_string());

        let (owner, name) = slug.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        if owner.chars().chain(name.chars()).any(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Repository owner (user or organization).
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSlug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The set of status states that count as failing.
///
/// Hosts disagree on vocabulary (`failure`, `failed`, `error`), so the set is
/// configurable. Names are stored lower-cased, deduplicated in the order
/// given, and matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureStates(Vec<String>);

impl FailureStates {
    /// Build a set from state names. Blank names are dropped.
    ///
    /// # Errors
    /// Returns [`Error::NoFailureStates`] if no names remain.
    pub fn new<I, S>(states: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: Vec<String> = Vec::new();
        for state in states {
            let state = state.as_ref().trim().to_lowercase();
            if !state.is_empty() && !set.contains(&state) {
                set.push(state);
            }
        }

        if set.is_empty() {
            return Err(Error::NoFailureStates);
        }
        Ok(Self(set))
    }

    /// Check whether `state` is failing.
    #[must_use]
    pub fn contains(&self, state: &str) -> bool {
        let state = state.to_lowercase();
        self.0.iter().any(|s| *s == state)
    }

    /// Iterate over the state names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for FailureStates {
    fn default() -> Self {
        Self(
            DEFAULT_FAILURE_STATES
                .iter()
                .map(ToString::to_string)
                .collect(),
        )
    }
}

impl fmt::Display for FailureStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_repo_slug_parse() {
        let slug = RepoSlug::parse("octo/widgets").unwrap();
        assert_eq!(slug.owner(), "octo");
        assert_eq!(slug.name(), "widgets");
        assert_eq!(slug.to_string(), "octo/widgets");
    }

    #[test]
    fn test_repo_slug_rejects_malformed() {
        for bad in ["", "octo", "octo/", "/widgets", "a/b/c", "oc to/widgets"] {
            assert!(
                matches!(RepoSlug::parse(bad), Err(Error::InvalidRepository(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_config_new_rejects_blank_label() {
        let repo = RepoSlug::parse("octo/widgets").unwrap();
        assert!(matches!(
            Config::new("  ", repo),
            Err(Error::MissingRequiredLabel)
        ));
    }

    #[test]
    fn test_blank_exempt_label_is_unset() {
        let repo = RepoSlug::parse("octo/widgets").unwrap();
        let config = Config::new("ready-to-test", repo)
            .unwrap()
            .with_exempt_label("");
        assert_eq!(config.exempt_label, None);
    }

    #[test]
    fn test_failure_states_case_insensitive() {
        let states = FailureStates::new(["Failure", " failed ", "FAILURE"]).unwrap();
        assert!(states.contains("failure"));
        assert!(states.contains("FAILED"));
        assert!(!states.contains("error"));
        assert_eq!(states.to_string(), "failure,failed");
    }

    #[test]
    fn test_failure_states_default() {
        let states = FailureStates::default();
        assert!(states.contains("failure"));
        assert!(states.contains("error"));
        assert!(!states.contains("pending"));
        assert!(!states.contains("success"));
        assert_eq!(states.to_string(), "failure,error");
    }

    #[test]
    fn test_failure_states_rejects_empty() {
        assert!(matches!(
            FailureStates::new(["", " "]),
            Err(Error::NoFailureStates)
        ));
    }

    #[test]
    fn test_build_applies_defaults() {
        let config = PartialConfig {
            required_label: Some("ready-to-test".into()),
            repository: Some("octo/widgets".into()),
            ..PartialConfig::default()
        }
        .build()
        .unwrap();

        assert_eq!(config.required_label, "ready-to-test");
        assert_eq!(config.exempt_label, None);
        assert_eq!(config.max_retry, DEFAULT_MAX_RETRY);
        assert_eq!(config.failure_states, FailureStates::default());
    }

    #[test]
    fn test_build_checks_required_label_first() {
        let err = PartialConfig::default().build().unwrap_err();
        assert!(matches!(err, Error::MissingRequiredLabel));

        let err = PartialConfig {
            required_label: Some("ready-to-test".into()),
            ..PartialConfig::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::MissingRepository));
    }

    #[test]
    fn test_or_prefers_upper_layer_and_skips_blanks() {
        let upper = PartialConfig {
            required_label: Some(String::new()),
            max_retry: Some(5),
            exempt_label: Some("skip-retest".into()),
            ..PartialConfig::default()
        };
        let lower = PartialConfig {
            required_label: Some("from-file".into()),
            max_retry: Some(1),
            repository: Some("octo/widgets".into()),
            ..PartialConfig::default()
        };

        let config = upper.or(lower).build().unwrap();
        assert_eq!(config.required_label, "from-file");
        assert_eq!(config.max_retry, 5);
        assert_eq!(config.exempt_label.as_deref(), Some("skip-retest"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("retest.toml");
        fs::write(
            &path,
            r#"
required_label = "ready-to-test"
exempt_label = "no-retest"
max_retry = 2
repository = "octo/widgets"
failure_states = ["failure", "error", "failed"]
"#,
        )
        .unwrap();

        let config = PartialConfig::load(&path).unwrap().build().unwrap();
        assert_eq!(config.max_retry, 2);
        assert_eq!(config.exempt_label.as_deref(), Some("no-retest"));
        assert!(config.failure_states.contains("failed"));
        assert_eq!(config.repository.to_string(), "octo/widgets");
    }

    #[test]
    fn test_load_rejects_bad_max_retry() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("retest.toml");
        fs::write(&path, "max_retry = \"lots\"\n").unwrap();

        assert!(matches!(
            PartialConfig::load(&path),
            Err(Error::ParseConfig { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            PartialConfig::load(&temp.path().join("missing.toml")),
            Err(Error::ReadConfig { .. })
        ));
    }
}
