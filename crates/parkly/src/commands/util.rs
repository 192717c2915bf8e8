//! Shared helpers for command handlers.

use std::io::IsTerminal;

use parkly_core::{Identity, Parkly, ResultEnvelope};

use crate::error::CliError;

/// Unwrap an envelope, turning its failure into a `CliError`.
pub fn envelope<T>(env: ResultEnvelope<T>) -> Result<T, CliError> {
    env.into_result().map_err(CliError::from)
}

/// The stored identity, or `NotAuthenticated` for `profile`.
pub fn require_session(client: &Parkly, profile: &str) -> Result<std::sync::Arc<Identity>, CliError> {
    client.identity().ok_or_else(|| CliError::NotAuthenticated {
        profile: profile.into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
