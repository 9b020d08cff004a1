mod catalog;
mod config_cmd;
mod inventory;
mod menus;
mod orders;
mod restaurants;
mod suppliers;

pub use catalog::CatalogCommand;
pub use config_cmd::ConfigCommand;
pub use inventory::InventoryCommand;
pub use menus::MenuCommand;
pub use orders::{OrderCommand, OrderSubcommand};
pub use restaurants::RestaurantCommand;
pub use suppliers::SupplierCommand;

use chrono::NaiveDate;
use clap::ValueEnum;
use tablekeep_core::{Completion, Entity, EntityPatch, HttpRemote, SyncEngine, SyncError};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

type Engine<T> = SyncEngine<T, HttpRemote>;

/// Applies a create locally, prints the placeholder id, then waits for the
/// server.
pub(crate) async fn create<T: Entity>(engine: &Engine<T>, patch: T::Patch, noun: &str) -> CommandResult {
    patch.validate()?;
    let completion = engine.create(patch);
    if let Some(local) = engine.snapshot().first() {
        println!("Added {} {}", noun, local.id());
    }
    settle(completion, noun).await
}

pub(crate) async fn update<T: Entity>(
    engine: &Engine<T>,
    id: &str,
    patch: T::Patch,
    noun: &str,
) -> CommandResult {
    patch.validate()?;
    if !engine.store().contains(id) {
        return Err(format!("{} not found: {}", capitalize(noun), id).into());
    }
    let completion = engine.update(id, patch);
    println!("Updated {} {}", noun, id);
    settle(completion, noun).await
}

pub(crate) async fn delete<T: Entity>(engine: &Engine<T>, id: &str, noun: &str) -> CommandResult {
    let existed = engine.store().contains(id);
    engine.delete(id).await?;
    if existed {
        println!("Deleted {} {}", noun, id);
    } else {
        println!("No local {} {}, nothing to delete", noun, id);
    }
    Ok(())
}

/// Reports the server's answer. Sync failures are not command failures:
/// the change is already stored locally.
async fn settle<T: Entity>(completion: Completion<T>, noun: &str) -> CommandResult {
    match completion.await {
        Ok(server) => println!("Synced {} {}", noun, server.id()),
        Err(SyncError::Invalid(e)) => return Err(e.into()),
        Err(e) => println!("Not synced ({}), change kept locally", e),
    }
    Ok(())
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", value))
}

/// Shortens `s` to `width` characters for table cells.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
