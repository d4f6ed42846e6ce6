//! Backlog - pending-change cache for StashDB
//!
//! CLI entry point that dispatches to subcommands.

use backlog::cache::BacklogCache;
use backlog::cli::{Cli, Commands};
use backlog::config::ConfigManager;
use backlog::error::BacklogResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> BacklogResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, cli.log_json || config.general.log_format == "json");
    debug!("Loaded config from {}", config_manager.path().display());

    // Config commands never touch the cache
    if let Commands::Config(args) = cli.command {
        return backlog::cli::commands::config(args, &config, &config_manager).await;
    }

    let cache = BacklogCache::open(&config, cli.state_dir.as_deref(), cli.user.clone()).await?;

    match cli.command {
        Commands::Config(_) => unreachable!("Config handled above"),
        Commands::Index(args) => backlog::cli::commands::index(args, &cache).await,
        Commands::Get(args) => backlog::cli::commands::get(args, &cache).await,
        Commands::Status(args) => backlog::cli::commands::status(args, &cache).await,
        Commands::Refetch(args) => backlog::cli::commands::refetch(args, &cache).await,
        Commands::Clear(args) => backlog::cli::commands::clear(args, &cache).await,
        Commands::Report(args) => backlog::cli::commands::report(args, &cache).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("backlog=warn"),
        1 => EnvFilter::new("backlog=info"),
        _ => EnvFilter::new("backlog=debug"),
    };

    // Logs go to stderr so command output stays pipeable
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }
}
