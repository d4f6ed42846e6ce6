//! Report command - dump the cache contents

use crate::cache::{BacklogCache, CacheReport, MaintainerGate, RecordKind};
use crate::cli::args::{OutputFormat, ReportArgs};
use crate::error::BacklogResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the report command
pub async fn execute(args: ReportArgs, cache: &BacklogCache) -> BacklogResult<()> {
    let report = cache.maintenance().report().await?;

    match args.format {
        OutputFormat::Table => print_table(&report, cache.maintenance().gate()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => print_plain(&report),
    }

    Ok(())
}

fn print_table(report: &CacheReport, gate: &MaintainerGate) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Backlog cache");
    ui::key_value(&ctx, "Backend", &report.backend);
    ui::key_value_status(
        &ctx,
        "Identity",
        gate.identity().unwrap_or("(none)"),
        gate.is_maintainer(),
    );

    let checked = report
        .index
        .last_updated
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    ui::key_value(&ctx, "Index checked", &checked);
    println!();

    println!(
        "{:<12} {:<10} {:<10}",
        style("KIND").bold(),
        style("INDEXED").bold(),
        style("CACHED").bold()
    );
    println!("{}", "-".repeat(34));

    for kind in RecordKind::all() {
        println!(
            "{:<12} {:<10} {:<10}",
            kind.plural(),
            report.indexed(*kind),
            report.cached(*kind)
        );
    }
}

fn print_plain(report: &CacheReport) {
    for (key, object) in report.objects.iter() {
        let fetched = object
            .last_updated
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        println!("{} {}", key, fetched);
    }
}
