//! Sync engine
//!
//! Keeps each list's local items consistent with its remote document.
//!
//! ## Rules
//!
//! 1. A list is loaded at most once per session, on first selection.
//! 2. Until that load completes (or fails), local changes are never pushed.
//! 3. Once loaded, every change that alters the document pushes the full
//!    list, in the order the changes happened.
//! 4. Remote failures never block: a failed load leaves the local items in
//!    place and marks the list loaded, a failed save is reported and
//!    dropped.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SyncEngine::start(registry, Arc::new(store))?;
//! engine.wait_loaded("todo").await?;
//! engine.add("buy milk", Priority::High)?;
//! engine.wait_idle().await;
//! ```

mod engine;
mod state;
mod worker;

pub use engine::{SyncEngine, SyncEvent};
pub use state::LoadPhase;
