//! Confirmation prompt with a non-interactive fallback

use super::context::UiContext;
use crate::error::{BacklogError, BacklogResult};

/// Ask for confirmation. Auto-yes approves; non-interactive returns `default`.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> BacklogResult<bool> {
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on the terminal
    let message = message.to_string();
    let answer = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| BacklogError::User(format!("Prompt task failed: {}", e)))?;

    answer.map_err(|e| BacklogError::User(format!("Prompt failed: {}", e)))
}
