//! Shared test helpers

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tabdo_core::{Item, ListConfig, ListRegistry, RemoteError, RemoteStore};
use tokio::sync::Semaphore;

/// A remote call as the store saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(String),
    Save(String, Vec<Item>),
}

/// Store that records every call in order
///
/// Loads can be held back with a gate so tests can act while a load is in
/// flight.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    documents: Mutex<HashMap<String, Vec<Item>>>,
    load_gate: Option<Arc<Semaphore>>,
    fail_loads: bool,
    fail_saves: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, store_id: &str, items: Vec<Item>) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(store_id.to_string(), items);
        self
    }

    /// Hold every load until a permit is added to the returned semaphore
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.load_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn failing_loads(mut self) -> Self {
        self.fail_loads = true;
        self
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, store_id: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                Call::Load(id) | Call::Save(id, _) => id == store_id,
            })
            .collect()
    }

    pub fn load_count(&self, store_id: &str) -> usize {
        self.calls_for(store_id)
            .iter()
            .filter(|call| matches!(call, Call::Load(_)))
            .count()
    }

    pub fn saves_for(&self, store_id: &str) -> Vec<Vec<Item>> {
        self.calls_for(store_id)
            .into_iter()
            .filter_map(|call| match call {
                Call::Save(_, items) => Some(items),
                Call::Load(_) => None,
            })
            .collect()
    }

    pub fn document(&self, store_id: &str) -> Option<Vec<Item>> {
        self.documents.lock().unwrap().get(store_id).cloned()
    }
}

#[async_trait]
impl RemoteStore for RecordingStore {
    async fn load(&self, store_id: &str) -> Result<Vec<Item>, RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Load(store_id.to_string()));

        if let Some(gate) = &self.load_gate {
            gate.acquire().await.expect("load gate closed").forget();
        }

        if self.fail_loads {
            return Err(RemoteError::Unavailable("connection refused".to_string()));
        }

        Ok(self.document(store_id).unwrap_or_default())
    }

    async fn save(&self, store_id: &str, items: &[Item]) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Save(store_id.to_string(), items.to_vec()));

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RemoteError::Status {
                store_id: store_id.to_string(),
                status: 503,
            });
        }

        self.documents
            .lock()
            .unwrap()
            .insert(store_id.to_string(), items.to_vec());
        Ok(())
    }
}

/// Two lists: "home" (store id 111, the default) and "work" (222)
pub fn two_lists() -> ListRegistry {
    ListRegistry::new(
        vec![ListConfig::new("home", "111"), ListConfig::new("work", "222")],
        None,
    )
    .unwrap()
}

pub fn texts(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.text.as_str()).collect()
}

/// Let spawned workers run
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}
