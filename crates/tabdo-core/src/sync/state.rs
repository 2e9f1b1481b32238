//! Per-list load phase
//!
//! ```text
//! Unloaded --begin_load--> Loading --finish_load--> Loaded
//! ```
//!
//! A list leaves `Loaded` only when the session ends. Saves are allowed in
//! `Loaded` alone, so a push can never overwrite the remote document with
//! state that predates the first load.

/// Load phase of one list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// No load issued yet
    #[default]
    Unloaded,
    /// Load in flight
    Loading,
    /// Load completed or was abandoned after a failure
    Loaded,
}

impl LoadPhase {
    /// Move to `Loading` if nothing was loaded yet
    ///
    /// Returns true when the caller must issue the load.
    pub fn begin_load(&mut self) -> bool {
        if *self == LoadPhase::Unloaded {
            *self = LoadPhase::Loading;
            true
        } else {
            false
        }
    }

    /// Record the end of a load, successful or not
    pub fn finish_load(&mut self) {
        *self = LoadPhase::Loaded;
    }

    pub fn is_loaded(&self) -> bool {
        *self == LoadPhase::Loaded
    }

    /// Whether local changes may be pushed to the remote store
    pub fn can_save(&self) -> bool {
        self.is_loaded()
    }
}
