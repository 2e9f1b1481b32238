//! Sync engine implementation

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::state::LoadPhase;
use super::worker::{spawn_list_worker, WorkerCommand, WorkerEvent, WorkerHandle};
use crate::error::{ListError, SyncError, SyncResult};
use crate::list::{ListState, Mutation};
use crate::models::{Item, Priority};
use crate::registry::ListRegistry;
use crate::remote::RemoteStore;

/// Events reported to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Remote document loaded and applied
    Loaded { list: String, items: usize },
    /// Load failed; the list keeps its local items and counts as loaded
    LoadFailed { list: String, error: String },
    /// A save reached the remote store
    Saved { list: String },
    /// A save failed and was dropped
    SaveFailed { list: String, error: String },
}

impl SyncEvent {
    /// Name of the list the event belongs to
    pub fn list(&self) -> &str {
        match self {
            SyncEvent::Loaded { list, .. }
            | SyncEvent::LoadFailed { list, .. }
            | SyncEvent::Saved { list }
            | SyncEvent::SaveFailed { list, .. } => list,
        }
    }
}

/// Sync bookkeeping for one registered list
#[derive(Debug)]
struct TrackedList {
    store_id: String,
    state: ListState,
    phase: LoadPhase,
    worker: Option<WorkerHandle>,
    /// Saves issued but not yet reported back
    pending_saves: usize,
    /// Error of the failed load, if the list was loaded that way
    load_error: Option<String>,
}

impl TrackedList {
    fn new(store_id: &str) -> Self {
        Self {
            store_id: store_id.to_string(),
            state: ListState::new(),
            phase: LoadPhase::Unloaded,
            worker: None,
            pending_saves: 0,
            load_error: None,
        }
    }
}

/// Coordinates list state with the remote store
///
/// All mutations go through the engine and apply to the active list. Remote
/// work runs in the background; its results are applied when the caller
/// drives [`next_event`](Self::next_event), [`wait_loaded`](Self::wait_loaded)
/// or [`wait_idle`](Self::wait_idle).
pub struct SyncEngine {
    registry: ListRegistry,
    store: Arc<dyn RemoteStore>,
    lists: HashMap<String, TrackedList>,
    active: String,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
    event_rx: mpsc::UnboundedReceiver<WorkerEvent>,
}

impl SyncEngine {
    /// Create an engine with every registered list empty and unloaded
    ///
    /// The default list is active but nothing is fetched until a list is
    /// selected. Use [`start`](Self::start) to load the default list eagerly.
    pub fn new(registry: ListRegistry, store: Arc<dyn RemoteStore>) -> Self {
        let lists = registry
            .entries()
            .iter()
            .map(|entry| (entry.name.clone(), TrackedList::new(&entry.store_id)))
            .collect();
        let active = registry.default_list().to_string();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            registry,
            store,
            lists,
            active,
            event_tx,
            event_rx,
        }
    }

    /// Create an engine and begin loading the default list
    ///
    /// Must be called within a tokio runtime.
    pub fn start(registry: ListRegistry, store: Arc<dyn RemoteStore>) -> SyncResult<Self> {
        let mut engine = Self::new(registry, store);
        let default = engine.active.clone();
        engine.select_list(&default)?;
        Ok(engine)
    }

    pub fn registry(&self) -> &ListRegistry {
        &self.registry
    }

    /// Name of the active list
    pub fn active_list(&self) -> &str {
        &self.active
    }

    /// Make `name` the active list, loading it if this is its first selection
    pub fn select_list(&mut self, name: &str) -> SyncResult<()> {
        if !self.lists.contains_key(name) {
            return Err(SyncError::UnknownList(name.to_string()));
        }

        if self.active != name {
            debug!("Switching active list '{}' -> '{}'", self.active, name);
            self.active = name.to_string();
        }
        self.ensure_loading(name)
    }

    // ==================== Queries ====================

    /// Items of the active list
    pub fn items(&self) -> &[Item] {
        self.items_of(&self.active).unwrap_or_default()
    }

    /// Items of the list called `name`
    pub fn items_of(&self, name: &str) -> Option<&[Item]> {
        self.lists.get(name).map(|t| t.state.items())
    }

    pub fn phase(&self, name: &str) -> Option<LoadPhase> {
        self.lists.get(name).map(|t| t.phase)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.phase(name).is_some_and(|p| p.is_loaded())
    }

    /// Error of the failed load that marked `name` as loaded, if any
    pub fn load_error(&self, name: &str) -> Option<&str> {
        self.lists.get(name).and_then(|t| t.load_error.as_deref())
    }

    /// Saves issued for `name` that have not completed yet
    pub fn pending_saves(&self, name: &str) -> usize {
        self.lists.get(name).map_or(0, |t| t.pending_saves)
    }

    /// True when no load or save is in flight
    pub fn is_idle(&self) -> bool {
        self.lists
            .values()
            .all(|t| t.phase != LoadPhase::Loading && t.pending_saves == 0)
    }

    // ==================== Intents ====================

    pub fn add(&mut self, text: &str, priority: Priority) -> SyncResult<Option<Mutation>> {
        self.mutate(|list| Ok(list.add(text, priority)))
    }

    pub fn delete(&mut self, id: &str) -> SyncResult<Option<Mutation>> {
        self.mutate(|list| Ok(list.delete(id)))
    }

    pub fn toggle_done(&mut self, id: &str) -> SyncResult<Option<Mutation>> {
        self.mutate(|list| Ok(list.toggle_done(id)))
    }

    pub fn start_edit(&mut self, id: &str) -> SyncResult<Option<Mutation>> {
        self.mutate(|list| Ok(list.start_edit(id)))
    }

    pub fn save_edit(&mut self, id: &str, text: &str) -> SyncResult<Option<Mutation>> {
        self.mutate(|list| Ok(list.save_edit(id, text)))
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> SyncResult<Option<Mutation>> {
        self.mutate(|list| list.reorder(from, to))
    }

    pub fn reorder_by_id(&mut self, active_id: &str, over_id: &str) -> SyncResult<Option<Mutation>> {
        self.mutate(|list| Ok(list.reorder_by_id(active_id, over_id)))
    }

    // ==================== Event loop ====================

    /// Wait for the next remote result and apply it
    ///
    /// Returns `None` once nothing is in flight.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        loop {
            if self.is_idle() {
                return None;
            }
            let event = self.event_rx.recv().await?;
            if let Some(event) = self.apply(event) {
                return Some(event);
            }
        }
    }

    /// Apply the next remote result if one is ready, without waiting
    pub fn try_next_event(&mut self) -> Option<SyncEvent> {
        while let Ok(event) = self.event_rx.try_recv() {
            if let Some(event) = self.apply(event) {
                return Some(event);
            }
        }
        None
    }

    /// Wait until the load of `name` has completed or failed
    ///
    /// Returns immediately if the list is not loading.
    pub async fn wait_loaded(&mut self, name: &str) -> SyncResult<Vec<SyncEvent>> {
        let mut events = Vec::new();
        loop {
            let phase = self
                .phase(name)
                .ok_or_else(|| SyncError::UnknownList(name.to_string()))?;
            if phase != LoadPhase::Loading {
                return Ok(events);
            }
            match self.next_event().await {
                Some(event) => events.push(event),
                None => return Ok(events),
            }
        }
    }

    /// Wait until every load and save has completed
    pub async fn wait_idle(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    // ==================== Internals ====================

    /// Run `op` on the active list and observe the resulting mutation
    fn mutate<F>(&mut self, op: F) -> SyncResult<Option<Mutation>>
    where
        F: FnOnce(&mut ListState) -> Result<Option<Mutation>, ListError>,
    {
        let name = self.active.clone();
        let tracked = self.tracked_mut(&name)?;

        let Some(mutation) = op(&mut tracked.state)? else {
            return Ok(None);
        };
        debug!("List '{}': {:?}", name, mutation);

        self.observe(&name, &mutation)?;
        Ok(Some(mutation))
    }

    /// Schedule a save for a mutation if the list may be pushed
    fn observe(&mut self, name: &str, mutation: &Mutation) -> SyncResult<()> {
        if !mutation.is_persisted() {
            return Ok(());
        }

        let tracked = self.tracked_mut(name)?;
        if !tracked.phase.can_save() {
            debug!("Not saving '{}' before its first load completes", name);
            return Ok(());
        }

        let snapshot = tracked.state.items().to_vec();
        self.dispatch(name, WorkerCommand::Save(snapshot))?;
        self.tracked_mut(name)?.pending_saves += 1;
        Ok(())
    }

    fn ensure_loading(&mut self, name: &str) -> SyncResult<()> {
        if !self.tracked_mut(name)?.phase.begin_load() {
            return Ok(());
        }

        debug!("Loading list '{}'", name);
        if let Err(e) = self.dispatch(name, WorkerCommand::Load) {
            self.tracked_mut(name)?.phase = LoadPhase::Unloaded;
            return Err(e);
        }
        Ok(())
    }

    /// Queue a command on the list's worker, spawning it on first use
    fn dispatch(&mut self, name: &str, command: WorkerCommand) -> SyncResult<()> {
        let store = Arc::clone(&self.store);
        let event_tx = self.event_tx.clone();
        let tracked = self.tracked_mut(name)?;
        let store_id = tracked.store_id.clone();

        let worker = tracked
            .worker
            .get_or_insert_with(|| spawn_list_worker(name.to_string(), store_id, store, event_tx));

        if !worker.send(command) {
            tracked.worker = None;
            return Err(SyncError::WorkerStopped(name.to_string()));
        }
        Ok(())
    }

    /// Apply a worker result to the engine state
    fn apply(&mut self, event: WorkerEvent) -> Option<SyncEvent> {
        match event {
            WorkerEvent::LoadFinished { list, result } => {
                let tracked = self.lists.get_mut(&list)?;
                tracked.phase.finish_load();

                match result {
                    Ok(items) => {
                        let count = items.len();
                        tracked.state.replace(items);
                        tracked.load_error = None;
                        info!("Loaded list '{}' ({} items)", list, count);
                        Some(SyncEvent::Loaded { list, items: count })
                    }
                    Err(e) => {
                        let cause = if e.is_transport() {
                            "store unreachable"
                        } else {
                            "store error"
                        };
                        warn!(
                            "Continuing with {} local item(s) for '{}' after failed load ({})",
                            tracked.state.len(),
                            list,
                            cause
                        );
                        let error = e.to_string();
                        tracked.load_error = Some(error.clone());
                        Some(SyncEvent::LoadFailed { list, error })
                    }
                }
            }
            WorkerEvent::SaveFinished { list, result } => {
                let tracked = self.lists.get_mut(&list)?;
                tracked.pending_saves = tracked.pending_saves.saturating_sub(1);

                match result {
                    Ok(()) => {
                        info!("Saved list '{}'", list);
                        Some(SyncEvent::Saved { list })
                    }
                    Err(e) => Some(SyncEvent::SaveFailed {
                        list,
                        error: e.to_string(),
                    }),
                }
            }
        }
    }

    fn tracked_mut(&mut self, name: &str) -> SyncResult<&mut TrackedList> {
        self.lists
            .get_mut(name)
            .ok_or_else(|| SyncError::UnknownList(name.to_string()))
    }
}
