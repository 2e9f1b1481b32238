//! Background worker for one list
//!
//! Each list gets its own task that runs remote commands strictly in the
//! order they were issued: the load first, then saves in mutation order.
//! Results go back to the engine over a shared channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::models::Item;
use crate::remote::RemoteStore;

/// Commands sent to a list worker
#[derive(Debug)]
pub(crate) enum WorkerCommand {
    /// Fetch the list document
    Load,
    /// Overwrite the list document with this snapshot
    Save(Vec<Item>),
}

/// Results reported by list workers
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    LoadFinished {
        list: String,
        result: Result<Vec<Item>, RemoteError>,
    },
    SaveFinished {
        list: String,
        result: Result<(), RemoteError>,
    },
}

/// Handle to a running list worker
#[derive(Debug)]
pub(crate) struct WorkerHandle {
    command_tx: mpsc::UnboundedSender<WorkerCommand>,
}

impl WorkerHandle {
    /// Queue a command; false if the worker is gone
    pub(crate) fn send(&self, command: WorkerCommand) -> bool {
        self.command_tx.send(command).is_ok()
    }
}

/// Spawn the worker for `list`
///
/// The worker stops once every handle is dropped and its queue drains.
pub(crate) fn spawn_list_worker(
    list: String,
    store_id: String,
    store: Arc<dyn RemoteStore>,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
) -> WorkerHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    tokio::spawn(list_worker_loop(list, store_id, store, command_rx, event_tx));
    WorkerHandle { command_tx }
}

async fn list_worker_loop(
    list: String,
    store_id: String,
    store: Arc<dyn RemoteStore>,
    mut command_rx: mpsc::UnboundedReceiver<WorkerCommand>,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
) {
    debug!("Sync worker for '{}' started", list);

    while let Some(command) = command_rx.recv().await {
        let event = match command {
            WorkerCommand::Load => {
                let result = run_load(Arc::clone(&store), store_id.clone()).await;
                if let Err(ref e) = result {
                    warn!("Loading list '{}' failed: {}", list, e);
                }
                WorkerEvent::LoadFinished {
                    list: list.clone(),
                    result,
                }
            }
            WorkerCommand::Save(items) => {
                let result = run_save(Arc::clone(&store), store_id.clone(), items).await;
                if let Err(ref e) = result {
                    warn!("Saving list '{}' failed: {}", list, e);
                }
                WorkerEvent::SaveFinished {
                    list: list.clone(),
                    result,
                }
            }
        };

        // Engine dropped: nobody is left to apply results
        if event_tx.send(event).is_err() {
            break;
        }
    }

    debug!("Sync worker for '{}' stopped", list);
}

/// Run a load in its own task; a panic in the store comes back as
/// [`RemoteError::Aborted`]
async fn run_load(store: Arc<dyn RemoteStore>, store_id: String) -> Result<Vec<Item>, RemoteError> {
    tokio::spawn(async move { store.load(&store_id).await }).await?
}

/// Run a save in its own task, like [`run_load`]
async fn run_save(
    store: Arc<dyn RemoteStore>,
    store_id: String,
    items: Vec<Item>,
) -> Result<(), RemoteError> {
    tokio::spawn(async move { store.save(&store_id, &items).await }).await?
}
