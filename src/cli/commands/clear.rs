//! Clear command - delete the whole cache

use crate::cache::BacklogCache;
use crate::cli::args::ClearArgs;
use crate::error::BacklogResult;
use crate::ui::{self, UiContext};

/// Execute the clear command
pub async fn execute(args: ClearArgs, cache: &BacklogCache) -> BacklogResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);

    // Check the gate before prompting
    cache.maintenance().gate().authorize("Clearing the cache")?;

    let report = cache.maintenance().report().await?;
    ui::key_value(&ctx, "Index entries", &report.index.len().to_string());
    ui::key_value(&ctx, "Cached objects", &report.objects.len().to_string());

    if !ui::confirm(&ctx, "Delete the backlog cache?", false).await? {
        ui::step_info(&ctx, "Aborted");
        return Ok(());
    }

    cache.maintenance().clear_all().await?;
    ui::step_ok(&ctx, "Cache cleared");
    Ok(())
}
