//! Handler for the `history` command group.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::persistence::build_stores;
use crate::port::outbound::store::ChatHistory;

/// Longest response preview shown by `history list`.
const PREVIEW_CHARS: usize = 160;

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}…")
}

/// Execute `history list`.
pub async fn execute_list(config: &Config) -> Result<()> {
    let (_, history) = build_stores(config)?;
    let entries = history.list().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "history.list",
            "entries": entries,
        }));
        return Ok(());
    }

    if entries.is_empty() {
        output::note("No saved queries.");
        return Ok(());
    }

    for entry in &entries {
        output::section(&format!(
            "#{} {}",
            entry.id,
            output::muted(entry.created_at.format("%Y-%m-%d %H:%M UTC"))
        ));
        output::field("Query", &entry.query);
        if !entry.response.is_empty() {
            output::field("Response", preview(&entry.response));
        }
    }
    Ok(())
}

/// Execute `history delete`.
pub async fn execute_delete(config: &Config, id: i32) -> Result<()> {
    let (_, history) = build_stores(config)?;
    let deleted = history.delete(id).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "history.delete",
            "id": id,
            "deleted": deleted,
        }));
        return Ok(());
    }

    if deleted {
        output::success(&format!("Deleted entry #{id}"));
    } else {
        output::warning(&format!("No entry #{id}"));
    }
    Ok(())
}

/// Execute `history clear`.
pub async fn execute_clear(config: &Config) -> Result<()> {
    let (_, history) = build_stores(config)?;
    let removed = history.clear().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "history.clear",
            "removed": removed,
        }));
        return Ok(());
    }

    output::success(&format!("Cleared {removed} entries"));
    Ok(())
}
