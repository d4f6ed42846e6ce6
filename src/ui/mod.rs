//! Terminal output for the CLI
//!
//! Uses `cliclack` when attached to a terminal and falls back to plain
//! prefixed lines in CI or when output is piped.

mod context;
mod output;
mod prompts;

pub use context::UiContext;
pub use output::{intro, key_value, key_value_status, step_info, step_ok, step_ok_detail, step_warn_hint};
pub use prompts::confirm;
