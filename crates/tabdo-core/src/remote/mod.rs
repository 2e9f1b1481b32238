//! Remote list store
//!
//! A key-value JSON document store: one document per list, addressed by an
//! opaque store id. A document is the full ordered array of items.
//!
//! ## Contract
//!
//! - `load` fetches the whole document. A missing or malformed document is
//!   an empty list, not an error.
//! - `save` overwrites the whole document (last writer wins).

mod http;
mod memory;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::models::Item;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// Storage backend for list documents
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Fetch the document stored under `store_id`
    async fn load(&self, store_id: &str) -> Result<Vec<Item>, RemoteError>;

    /// Overwrite the document stored under `store_id`
    async fn save(&self, store_id: &str, items: &[Item]) -> Result<(), RemoteError>;
}
