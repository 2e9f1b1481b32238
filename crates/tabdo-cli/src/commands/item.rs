//! Item command handlers
//!
//! Each handler runs against an engine whose active list is already loaded.

use anyhow::{bail, Context, Result};

use tabdo_core::{Item, Mutation, Priority, SyncEngine};

use crate::output::Output;
use crate::session::{ensure_safe_to_save, flush};

/// Show the active list
pub fn show(engine: &SyncEngine, output: &Output) -> Result<()> {
    let list = engine.active_list();
    if let Some(error) = engine.load_error(list) {
        output.warning(&format!("Could not load list '{}': {}", list, error));
    }
    output.print_items(list, engine.items());
    Ok(())
}

/// Add an item to the active list
pub async fn add(
    engine: &mut SyncEngine,
    text: String,
    priority: Priority,
    force: bool,
    output: &Output,
) -> Result<()> {
    ensure_safe_to_save(engine, force)?;

    let Some(Mutation::Added { id }) = engine.add(&text, priority)? else {
        bail!("Nothing to add: item text is blank");
    };
    flush(engine).await?;

    output.success(&format!("Added to {}", engine.active_list()));
    if let Some(item) = engine.items().iter().find(|item| item.id == id) {
        output.print_item(item);
    }
    Ok(())
}

/// Toggle the done flag of an item
pub async fn toggle(engine: &mut SyncEngine, id: String, force: bool, output: &Output) -> Result<()> {
    ensure_safe_to_save(engine, force)?;
    let id = resolve_item_id(engine.items(), &id)?;

    let done = match engine.toggle_done(&id)? {
        Some(Mutation::Toggled { done, .. }) => done,
        _ => bail!("Item not found: {}", id),
    };
    flush(engine).await?;

    let state = if done { "done" } else { "not done" };
    output.success(&format!("Marked {} as {}", id, state));
    Ok(())
}

/// Replace the text of an item
pub async fn edit(
    engine: &mut SyncEngine,
    id: String,
    text: String,
    force: bool,
    output: &Output,
) -> Result<()> {
    ensure_safe_to_save(engine, force)?;
    let id = resolve_item_id(engine.items(), &id)?;

    engine.start_edit(&id)?;
    if engine.save_edit(&id, &text)?.is_none() {
        bail!("Item not found: {}", id);
    }
    flush(engine).await?;

    output.success(&format!("Updated {}", id));
    Ok(())
}

/// Delete an item
pub async fn delete(engine: &mut SyncEngine, id: String, force: bool, output: &Output) -> Result<()> {
    ensure_safe_to_save(engine, force)?;
    let id = resolve_item_id(engine.items(), &id)?;

    if engine.delete(&id)?.is_none() {
        bail!("Item not found: {}", id);
    }
    flush(engine).await?;

    output.success(&format!("Deleted {}", id));
    Ok(())
}

/// Move an item between 1-based positions
pub async fn move_item(
    engine: &mut SyncEngine,
    from: usize,
    to: usize,
    force: bool,
    output: &Output,
) -> Result<()> {
    ensure_safe_to_save(engine, force)?;

    let (Some(from_index), Some(to_index)) = (from.checked_sub(1), to.checked_sub(1)) else {
        bail!("Positions start at 1");
    };

    let moved = engine
        .reorder(from_index, to_index)
        .with_context(|| format!("Cannot move item {} to position {}", from, to))?;

    if moved.is_none() {
        output.message("Item is already at that position");
        return Ok(());
    }
    flush(engine).await?;

    output.success(&format!("Moved item {} to position {}", from, to));
    Ok(())
}

/// Resolve an item id (supports full id or unique prefix)
fn resolve_item_id(items: &[Item], id: &str) -> Result<String> {
    if items.iter().any(|item| item.id == id) {
        return Ok(id.to_string());
    }

    let matches: Vec<_> = items.iter().filter(|item| item.id.starts_with(id)).collect();

    match matches.len() {
        0 => bail!("No item found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple items match '{}':", id);
            for item in &matches {
                eprintln!("  {} - {}", item.id, item.text);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
