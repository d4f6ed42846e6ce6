//! Get command - show pending changes for one record

use crate::cache::{BacklogCache, DataObject, RecordKind};
use crate::cli::args::{GetArgs, OutputFormat};
use crate::error::BacklogResult;
use crate::ui::{self, UiContext};
use serde_json::Value;

/// Execute the get command
pub async fn execute(args: GetArgs, cache: &BacklogCache) -> BacklogResult<()> {
    let kind = args.record.kind;
    let id = args.record.id;

    let mut manifest = cache.get_manifest(false).await?;
    let object = cache.get_data_for(kind, &id, Some(&mut manifest)).await?;

    // Label-only entries (e.g. a performer flagged "split") have no payload
    let labels = manifest
        .entry(kind, &id)
        .map(|entry| entry.labels().to_vec())
        .unwrap_or_default();

    match args.format {
        OutputFormat::Json => {
            let json = match &object {
                Some(object) => serde_json::to_string_pretty(object)?,
                None => "null".to_string(),
            };
            println!("{}", json);
        }
        OutputFormat::Plain => {
            if let Some(object) = &object {
                for label in object.change_labels() {
                    println!("{}", label);
                }
            } else {
                for label in &labels {
                    println!("{}", label);
                }
            }
        }
        OutputFormat::Table => print_table(kind, &id, object.as_ref(), &labels),
    }

    Ok(())
}

fn print_table(kind: RecordKind, id: &str, object: Option<&DataObject>, labels: &[String]) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, &format!("{} {}", kind, id));

    let Some(object) = object else {
        if labels.is_empty() {
            ui::step_info(&ctx, "No pending changes");
        } else {
            ui::step_info(&ctx, &format!("Pending: {}", labels.join(", ")));
        }
        return;
    };

    if let Some(hash) = object.content_hash.as_deref().filter(|h| !h.is_empty()) {
        ui::key_value(&ctx, "Content hash", hash);
    }
    if let Some(fetched) = object.last_updated {
        ui::key_value(&ctx, "Fetched", &fetched.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    println!();

    for (field, value) in &object.fields {
        ui::key_value(&ctx, field, &summarize(value));
    }
}

/// One-line rendering of a field value
fn summarize(value: &Value) -> String {
    match value {
        Value::Null => "(remove)".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("{} item(s)", items.len()),
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(key, inner)| match inner {
                    Value::Array(items) => format!("{} {}", items.len(), key),
                    _ => key.clone(),
                })
                .collect();
            parts.join(", ")
        }
        other => other.to_string(),
    }
}
