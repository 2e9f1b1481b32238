//! tabdo Core Library
//!
//! This crate provides the core functionality for tabdo, a multi-list to-do
//! client whose lists live as JSON documents in a remote key-value store.
//!
//! # Architecture
//!
//! - **List state**: ordered items per list, changed through discrete
//!   mutations
//! - **Sync engine**: loads each list once, then pushes the full list after
//!   every change, never before the first load completes
//! - **Remote store**: GET/PUT of whole JSON documents
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let registry = ListRegistry::from_config(&config)?;
//! let store = HttpStore::from_config(&config)?;
//!
//! let mut engine = SyncEngine::start(registry, Arc::new(store))?;
//! engine.wait_loaded(engine.registry().default_list()).await?;
//!
//! engine.add("buy milk", Priority::High)?;
//! engine.wait_idle().await;
//! ```
//!
//! # Modules
//!
//! - `models`: Items, priorities and the wire format
//! - `list`: In-memory list state and mutations
//! - `registry`: Selectable lists and their store ids
//! - `remote`: Remote store contract, HTTP and in-memory stores
//! - `sync`: Sync engine
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod list;
pub mod models;
pub mod registry;
pub mod remote;
pub mod sync;

pub use config::{Config, ListConfig};
pub use error::{ListError, RegistryError, RemoteError, SyncError, SyncResult};
pub use list::{ListState, Mutation};
pub use models::{Item, Priority};
pub use registry::ListRegistry;
pub use remote::{HttpStore, MemoryStore, RemoteStore};
pub use sync::{LoadPhase, SyncEngine, SyncEvent};
