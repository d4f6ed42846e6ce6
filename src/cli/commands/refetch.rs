//! Refetch command - force one record to be downloaded again

use crate::cache::BacklogCache;
use crate::cli::args::RecordArgs;
use crate::error::{BacklogError, BacklogResult};
use console::style;

/// Execute the refetch command
pub async fn execute(args: RecordArgs, cache: &BacklogCache) -> BacklogResult<()> {
    println!(
        "Refetching {}...",
        style(format!("{}/{}", args.kind, args.id)).cyan()
    );

    if !cache.maintenance().force_refetch(args.kind, &args.id).await? {
        return Err(BacklogError::User(format!(
            "Nothing stored for {}/{} (resolved upstream or unreachable)",
            args.kind, args.id
        )));
    }

    println!(
        "{} {}/{} refreshed",
        style("✓").green(),
        args.kind,
        args.id
    );
    Ok(())
}
