//! Shared helpers for command handlers.

use std::io::IsTerminal;

use doorwatch_api::DoorClient;

use crate::config::Resolved;
use crate::error::CliError;

/// Build an HTTP client for the resolved controller.
pub fn client(resolved: &Resolved) -> Result<DoorClient, CliError> {
    Ok(doorwatch_core::build_client(&resolved.monitor)?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
