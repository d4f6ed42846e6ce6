//! Index command - show the backlog index

use crate::cache::{BacklogCache, Manifest, RecordKind};
use crate::cli::args::{IndexArgs, OutputFormat};
use crate::error::BacklogResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the index command
pub async fn execute(args: IndexArgs, cache: &BacklogCache) -> BacklogResult<()> {
    let manifest = cache.get_manifest(args.force).await?;

    match args.format {
        OutputFormat::Table => print_table(&manifest),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&manifest)?),
        OutputFormat::Plain => print_plain(&manifest),
    }

    Ok(())
}

fn print_table(manifest: &Manifest) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Backlog index");

    let checked = manifest
        .last_updated
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    ui::key_value(&ctx, "Last checked", &checked);
    println!();

    println!(
        "{:<12} {:<10} {:<10}",
        style("KIND").bold(),
        style("ENTRIES").bold(),
        style("NO HASH").bold()
    );
    println!("{}", "-".repeat(34));

    for kind in RecordKind::all() {
        let entries = manifest.entries(*kind);
        let without_hash = entries.values().filter(|e| !e.has_hash()).count();
        println!("{:<12} {:<10} {:<10}", kind.plural(), entries.len(), without_hash);
    }

    println!();
    println!("{} record(s) with pending changes", manifest.len());
}

fn print_plain(manifest: &Manifest) {
    for kind in RecordKind::all() {
        for (id, entry) in manifest.entries(*kind) {
            println!("{}/{} {}", kind, id, entry.labels().join(","));
        }
    }
}
