//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;

use slide_core::{Controller, CoreError, Cover};

use crate::error::CliError;

/// Resolve a cover identifier (id, cloud id, host or name).
///
/// A host that is configured but never answered during setup gets a
/// connection error rather than "not found".
pub async fn resolve_cover(controller: &Controller, identifier: &str) -> Result<Arc<Cover>, CliError> {
    match controller.find(identifier) {
        Ok(cover) => Ok(cover),
        Err(CoreError::CoverNotFound { .. })
            if controller
                .pending_hosts()
                .await
                .iter()
                .any(|h| h == identifier) =>
        {
            Err(CliError::ConnectionFailed {
                target: identifier.to_owned(),
                source: "device did not answer during setup".into(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` becomes mandatory.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// `42%` or `-` when no position has been observed.
pub fn percent_label(cover: &Cover) -> String {
    cover
        .current_position_percent()
        .map_or_else(|| "-".into(), |p| format!("{p}%"))
}
