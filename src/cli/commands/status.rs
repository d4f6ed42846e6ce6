//! Status command - where a record stands in the cache

use crate::cache::{BacklogCache, RecordStatus};
use crate::cli::args::RecordArgs;
use crate::error::BacklogResult;
use console::style;

/// Execute the status command
pub async fn execute(args: RecordArgs, cache: &BacklogCache) -> BacklogResult<()> {
    let status = cache.maintenance().status(args.kind, &args.id).await?;

    let styled = match status {
        RecordStatus::PendingWithDetail => style(status.to_string()).green(),
        RecordStatus::PendingNoDetail => style(status.to_string()).yellow(),
        RecordStatus::AbsentUpstream => style(status.to_string()).dim(),
        RecordStatus::Unknown => style(status.to_string()).red(),
    };

    println!("{}/{}: {}", args.kind, args.id, styled);
    Ok(())
}
