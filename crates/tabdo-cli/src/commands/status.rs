//! Status command handler

use anyhow::Result;

use tabdo_core::{Config, SyncEngine};

use crate::output::{Output, OutputFormat};

/// Load state of one list after the status sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStatus {
    pub name: String,
    pub store_id: String,
    pub default: bool,
    pub items: usize,
    pub done: usize,
    pub error: Option<String>,
}

/// Load every list and report what the store holds
pub async fn show(config: &Config, engine: &mut SyncEngine, output: &Output) -> Result<()> {
    let statuses = collect(engine).await?;

    match output.format {
        OutputFormat::Json => {
            let lists: Vec<_> = statuses
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "name": s.name,
                        "store_id": s.store_id,
                        "default": s.default,
                        "loaded": s.error.is_none(),
                        "items": s.items,
                        "done": s.done,
                        "error": s.error
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "store_url": config.store_url,
                    "lists": lists
                })
            );
        }
        OutputFormat::Quiet => {
            for status in &statuses {
                let state = if status.error.is_none() { "ok" } else { "error" };
                println!("{}\t{}", status.name, state);
            }
        }
        OutputFormat::Human => {
            println!("tabdo Status");
            println!("============");
            println!();
            println!("Store: {}", config.store_url);
            println!();
            for status in &statuses {
                let marker = if status.default { "*" } else { " " };
                match &status.error {
                    None => println!(
                        "{} {:<20} {} item(s), {} done",
                        marker, status.name, status.items, status.done
                    ),
                    Some(error) => {
                        println!("{} {:<20} unavailable: {}", marker, status.name, error)
                    }
                }
            }
        }
    }

    Ok(())
}

/// Select each list in turn, wait for all loads, then restore the active list
async fn collect(engine: &mut SyncEngine) -> Result<Vec<ListStatus>> {
    let active = engine.active_list().to_string();
    let names: Vec<String> = engine.registry().names().map(str::to_string).collect();

    for name in &names {
        engine.select_list(name)?;
    }
    engine.wait_idle().await;
    engine.select_list(&active)?;

    let default = engine.registry().default_list().to_string();
    let statuses = engine
        .registry()
        .entries()
        .iter()
        .map(|entry| {
            let items = engine.items_of(&entry.name).unwrap_or_default();
            ListStatus {
                name: entry.name.clone(),
                store_id: entry.store_id.clone(),
                default: entry.name == default,
                items: items.len(),
                done: items.iter().filter(|item| item.done).count(),
                error: engine.load_error(&entry.name).map(str::to_string),
            }
        })
        .collect();

    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tabdo_core::{Item, ListConfig, ListRegistry, MemoryStore, Priority};

    #[tokio::test]
    async fn test_collect_loads_every_list_and_keeps_active() {
        let mut config = Config::default();
        config.lists = vec![ListConfig::new("home", "111"), ListConfig::new("work", "222")];
        config.default_list = Some("work".to_string());

        let mut done = Item::new("2", "report", Priority::High);
        done.done = true;
        let store = Arc::new(MemoryStore::with_documents([
            ("111", vec![Item::new("1", "dishes", Priority::Normal)]),
            ("222", vec![done, Item::new("3", "email", Priority::Low)]),
        ]));

        let registry = ListRegistry::from_config(&config).unwrap();
        let mut engine = SyncEngine::start(registry, store).unwrap();

        let statuses = collect(&mut engine).await.unwrap();
        assert_eq!(engine.active_list(), "work");
        assert_eq!(
            statuses[0],
            ListStatus {
                name: "home".to_string(),
                store_id: "111".to_string(),
                default: false,
                items: 1,
                done: 0,
                error: None,
            }
        );
        assert_eq!(statuses[1].items, 2);
        assert_eq!(statuses[1].done, 1);
        assert!(statuses[1].default);
    }
}
