//! Engine setup shared by the list commands

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tabdo_core::{Config, ListRegistry, RemoteStore, SyncEngine, SyncEvent};

/// Build an engine, select `list` (or the default list) and wait for its load
///
/// A failed load does not fail here; the engine keeps going with an empty
/// list and records the error.
pub async fn open(
    config: &Config,
    store: Arc<dyn RemoteStore>,
    list: Option<&str>,
) -> Result<SyncEngine> {
    let registry = ListRegistry::from_config(config).context("Invalid list configuration")?;

    let mut engine = match list {
        Some(name) => {
            let mut engine = SyncEngine::new(registry, store);
            engine.select_list(name)?;
            engine
        }
        None => SyncEngine::start(registry, store)?,
    };

    let name = engine.active_list().to_string();
    engine.wait_loaded(&name).await?;
    Ok(engine)
}

/// Refuse to change a list whose load failed, unless forced
///
/// Saving would replace the remote document with the (empty) local list.
pub fn ensure_safe_to_save(engine: &SyncEngine, force: bool) -> Result<()> {
    let list = engine.active_list();
    if let Some(error) = engine.load_error(list) {
        if !force {
            bail!(
                "Could not load list '{}': {}\n\
                 Saving now would overwrite the remote list. Re-run with --force to save anyway.",
                list,
                error
            );
        }
    }
    Ok(())
}

/// Wait for all pending saves and fail if any of them did not reach the store
pub async fn flush(engine: &mut SyncEngine) -> Result<()> {
    let failure = engine
        .wait_idle()
        .await
        .into_iter()
        .filter_map(|event| match event {
            SyncEvent::SaveFailed { list, error } => Some((list, error)),
            _ => None,
        })
        .last();

    if let Some((list, error)) = failure {
        bail!("Failed to save list '{}': {}", list, error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tabdo_core::{Item, ListConfig, MemoryStore, Priority, RemoteError};

    struct OfflineStore;

    #[async_trait]
    impl RemoteStore for OfflineStore {
        async fn load(&self, _store_id: &str) -> Result<Vec<Item>, RemoteError> {
            Err(RemoteError::Unavailable("offline".to_string()))
        }

        async fn save(&self, _store_id: &str, _items: &[Item]) -> Result<(), RemoteError> {
            Err(RemoteError::Unavailable("offline".to_string()))
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.lists = vec![ListConfig::new("home", "111"), ListConfig::new("work", "222")];
        config
    }

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_documents([
            ("111", vec![Item::new("1", "dishes", Priority::Normal)]),
            ("222", vec![Item::new("2", "report", Priority::High)]),
        ]))
    }

    #[tokio::test]
    async fn test_open_default_list() {
        let engine = open(&config(), store(), None).await.unwrap();
        assert_eq!(engine.active_list(), "home");
        assert!(engine.is_loaded("home"));
        assert!(!engine.is_loaded("work"));
        assert_eq!(engine.items()[0].text, "dishes");
    }

    #[tokio::test]
    async fn test_open_named_list_only_loads_that_list() {
        let engine = open(&config(), store(), Some("work")).await.unwrap();
        assert_eq!(engine.active_list(), "work");
        assert_eq!(engine.items()[0].text, "report");
        assert!(!engine.is_loaded("home"));
    }

    #[tokio::test]
    async fn test_open_unknown_list() {
        let err = open(&config(), store(), Some("garden")).await.err().unwrap();
        assert!(err.to_string().contains("garden"));
    }

    #[tokio::test]
    async fn test_failed_load_blocks_saving_unless_forced() {
        let engine = open(&config(), Arc::new(OfflineStore), None).await.unwrap();
        assert!(engine.is_loaded("home"));

        let err = ensure_safe_to_save(&engine, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(ensure_safe_to_save(&engine, true).is_ok());
    }

    #[tokio::test]
    async fn test_flush_reports_failed_save() {
        let mut engine = open(&config(), Arc::new(OfflineStore), None).await.unwrap();
        engine.add("anyway", Priority::Normal).unwrap();

        let err = flush(&mut engine).await.unwrap_err();
        assert!(err.to_string().contains("Failed to save list 'home'"));
    }

    #[tokio::test]
    async fn test_flush_after_successful_save() {
        let store = store();
        let mut engine = open(&config(), store.clone(), None).await.unwrap();
        engine.add("laundry", Priority::Low).unwrap();

        flush(&mut engine).await.unwrap();
        assert_eq!(store.document("111").await.unwrap().len(), 2);
    }
}
