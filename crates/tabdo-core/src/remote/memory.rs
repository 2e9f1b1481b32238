//! In-process store
//!
//! Keeps documents in a map. Used in tests and by embedders that need a
//! store without a network.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::RemoteStore;
use crate::error::RemoteError;
use crate::models::Item;

/// Store that keeps list documents in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Vec<Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one document per entry
    pub fn with_documents<I, K>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<Item>)>,
        K: Into<String>,
    {
        Self {
            documents: Mutex::new(
                documents
                    .into_iter()
                    .map(|(id, items)| (id.into(), items))
                    .collect(),
            ),
        }
    }

    /// Current document for `store_id`, if one was ever saved
    pub async fn document(&self, store_id: &str) -> Option<Vec<Item>> {
        self.documents.lock().await.get(store_id).cloned()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn load(&self, store_id: &str) -> Result<Vec<Item>, RemoteError> {
        let documents = self.documents.lock().await;
        let mut items = documents.get(store_id).cloned().unwrap_or_default();
        // Same view of the document an HTTP round trip would give
        for item in &mut items {
            item.editing = false;
        }
        Ok(items)
    }

    async fn save(&self, store_id: &str, items: &[Item]) -> Result<(), RemoteError> {
        self.documents
            .lock()
            .await
            .insert(store_id.to_string(), items.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[tokio::test]
    async fn test_missing_document_loads_empty() {
        let store = MemoryStore::new();
        assert!(store.load("nope").await.unwrap().is_empty());
        assert!(store.document("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemoryStore::with_documents([(
            "1",
            vec![Item::new("a", "old", Priority::Normal)],
        )]);

        let mut draft = Item::new("b", "new", Priority::High);
        draft.editing = true;
        store.save("1", &[draft]).await.unwrap();

        let loaded = store.load("1").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b");
        assert!(!loaded[0].editing);
    }
}
