//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod check;
pub mod run;
mod utils;

pub use utils::Settings;

/// retest - retry failing CI checks on labeled pull requests.
///
/// Scans open pull requests carrying the required label and posts
/// `/retest <context>` for each failing commit status, up to a per-check
/// retry budget counted from the PR's comment history.
#[derive(Parser)]
#[command(name = "retest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration flags. Each can also come from the environment, using
/// the names a GitHub Actions runner passes inputs under.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Label a pull request must carry to be retried.
    #[arg(long, global = true, env = "INPUT_REQUIRED-LABEL")]
    pub required_label: Option<String>,

    /// Label that exempts a pull request from retries.
    #[arg(long, global = true, env = "INPUT_EXEMPT-LABEL")]
    pub exempt_label: Option<String>,

    /// Maximum `/retest` comments per check [default: 3].
    #[arg(long, global = true, env = "INPUT_MAXRETRY")]
    pub max_retry: Option<String>,

    /// Repository to sweep, as owner/name.
    #[arg(long, global = true, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Comma-separated status states treated as failing [default: failure,error].
    #[arg(
        long,
        global = true,
        env = "INPUT_FAILURE-STATES",
        value_delimiter = ','
    )]
    pub failure_states: Option<Vec<String>>,

    /// GitHub API base URL; blank means https://api.github.com.
    #[arg(long, global = true, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// TOML file with default values for the options above.
    #[arg(long, global = true, env = "RETEST_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sweep open pull requests and post retries.
    ///
    /// For each open PR with the required label and without the exempt
    /// label, every failing status on the head commit gets a `/retest`
    /// comment and a notice for the author, unless its budget is spent.
    Run {
        /// Log the comments that would be posted without posting them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and check access to the repository.
    ///
    /// Posts nothing.
    #[command(alias = "doctor")]
    Check,
}
