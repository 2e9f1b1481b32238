//! Error types
//!
//! Remote failures are recoverable by design: the sync engine turns them
//! into events instead of returning them to the caller. The remaining
//! errors describe misuse (unknown list, bad index) or bad configuration.

use thiserror::Error;

/// Errors from a remote list store
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport failure, including timeouts
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Store returned HTTP {status} for list document '{store_id}'")]
    Status { store_id: String, status: u16 },

    /// The save payload could not be serialized
    #[error("Failed to encode list document: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store is not reachable (used by in-process stores)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store call panicked or was cancelled before it returned
    #[error("Store call aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

impl RemoteError {
    /// Whether the failure happened before the store answered
    ///
    /// Timeouts and connection errors fall in this bucket; an HTTP status
    /// means the store was reached and refused the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Http(_) | RemoteError::Unavailable(_))
    }
}

/// Errors from list state operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// A reorder index does not address an existing item
    #[error("Position {index} is out of range for a list of {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors building the list registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No lists are configured. Add at least one [[lists]] entry.")]
    Empty,

    #[error("List names must not be blank")]
    BlankName,

    #[error("List '{name}' has a blank store id")]
    BlankStoreId { name: String },

    #[error("List '{0}' is configured more than once")]
    DuplicateName(String),

    #[error("Default list '{0}' is not a configured list")]
    UnknownDefault(String),
}

/// Errors from sync engine operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unknown list: '{0}'")]
    UnknownList(String),

    #[error(transparent)]
    List(#[from] ListError),

    /// The background worker for a list went away
    #[error("Sync worker for list '{0}' has stopped")]
    WorkerStopped(String),
}

/// Result type for sync engine operations
pub type SyncResult<T> = Result<T, SyncError>;
