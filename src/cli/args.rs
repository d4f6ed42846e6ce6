//! CLI argument definitions using clap derive

use crate::cache::RecordKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Backlog - pending-change cache for StashDB
///
/// Keeps a local copy of the community backlog of proposed scene and
/// performer edits and refreshes it only when the upstream data changed.
#[derive(Parser, Debug)]
#[command(name = "backlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BACKLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted cache
    #[arg(long, global = true, env = "BACKLOG_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Displayed name of the current user (for maintainer-only commands)
    #[arg(short, long, global = true, env = "BACKLOG_USER")]
    pub user: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the backlog index, refreshing it when stale
    Index(IndexArgs),

    /// Show pending changes for one record
    Get(GetArgs),

    /// Show where a record stands in the cache (no network access)
    Status(RecordArgs),

    /// Refetch one record from upstream (maintainers only)
    Refetch(RecordArgs),

    /// Delete the whole cache (maintainers only)
    Clear(ClearArgs),

    /// Dump the cache contents
    Report(ReportArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// A record addressed by kind and id
#[derive(Parser, Debug)]
pub struct RecordArgs {
    /// Record kind: scene or performer
    pub kind: RecordKind,

    /// StashDB record id
    pub id: String,
}

/// Arguments for the index command
#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Download the index even if the cached copy is fresh
    #[arg(long)]
    pub force: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub record: RecordArgs,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
