//! `retest check` command - Validate configuration and repository access.

use anyhow::{Context, Result, bail};

use super::Settings;
use crate::output;

/// Run the check command.
pub fn run(settings: &Settings) -> Result<()> {
    let config = &settings.config;

    output::success("Configuration is valid");
    output::info(&format!("repository:     {}", config.repository));
    output::info(&format!("required label: {}", config.required_label));
    output::info(&format!(
        "exempt label:   {}",
        config.exempt_label.as_deref().unwrap_or("(none)")
    ));
    output::info(&format!("max retry:      {}", config.max_retry));
    output::info(&format!("failure states: {}", config.failure_states));
    output::info(&format!("api url:        {}", settings.api_url));

    let client = settings.client()?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let repo = rt
        .block_on(client.get_repository(
            config.repository.owner(),
            config.repository.name(),
        ))
        .with_context(|| format!("Cannot access {}", config.repository))?;

    if repo.archived {
        bail!("{} is archived; comments cannot be posted", repo.full_name);
    }

    match repo.permissions {
        Some(permissions) if !permissions.push => output::warn(&format!(
            "Token has read-only access to {}; posting comments may fail",
            repo.full_name
        )),
        _ => output::success(&format!("Reached {}", repo.full_name)),
    }

    Ok(())
}
