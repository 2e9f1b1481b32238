//! In-memory list state
//!
//! A [`ListState`] owns the ordered items of one list. The sequence order is
//! the display order and is part of the persisted document.
//!
//! Every operation either leaves the sequence untouched and returns `None`,
//! or changes it and returns the [`Mutation`] it performed. The sync engine
//! observes those values to decide when to push the list to the remote
//! store.

use chrono::Utc;

use crate::error::ListError;
use crate::models::{Item, Priority};

/// A change applied to a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Added { id: String },
    Deleted { id: String },
    Toggled { id: String, done: bool },
    EditStarted { id: String },
    Edited { id: String },
    Moved { from: usize, to: usize },
}

impl Mutation {
    /// Whether the change alters the persisted document
    ///
    /// Entering edit mode only touches view state.
    pub fn is_persisted(&self) -> bool {
        !matches!(self, Mutation::EditStarted { .. })
    }
}

/// Generates millisecond-timestamp ids that never repeat within a session
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, strictly greater than every id handed out before
    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Ordered items of one list
#[derive(Debug, Default)]
pub struct ListState {
    items: Vec<Item>,
    ids: IdGenerator,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list state holding `items`
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            ids: IdGenerator::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Replace the whole sequence (used when a load completes)
    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Append a new item
    ///
    /// Blank text (after trimming) is rejected as a no-op. The stored text
    /// is kept as typed.
    pub fn add(&mut self, text: &str, priority: Priority) -> Option<Mutation> {
        if text.trim().is_empty() {
            return None;
        }

        let id = self.fresh_id();
        self.items.push(Item::new(id.clone(), text, priority));
        Some(Mutation::Added { id })
    }

    /// Remove the item with `id`
    pub fn delete(&mut self, id: &str) -> Option<Mutation> {
        let pos = self.position(id)?;
        self.items.remove(pos);
        Some(Mutation::Deleted { id: id.to_string() })
    }

    /// Flip the done flag of the item with `id`
    pub fn toggle_done(&mut self, id: &str) -> Option<Mutation> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.done = !item.done;
        Some(Mutation::Toggled {
            id: id.to_string(),
            done: item.done,
        })
    }

    /// Put the item with `id` into edit mode
    ///
    /// Other items keep their edit flags, so several items can be in edit
    /// mode at once.
    pub fn start_edit(&mut self, id: &str) -> Option<Mutation> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.editing = true;
        Some(Mutation::EditStarted { id: id.to_string() })
    }

    /// Replace the text of the item with `id` and leave edit mode
    pub fn save_edit(&mut self, id: &str, text: &str) -> Option<Mutation> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.text = text.to_string();
        item.editing = false;
        Some(Mutation::Edited { id: id.to_string() })
    }

    /// Move the item at `from` to `to`, shifting the items in between
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<Option<Mutation>, ListError> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(ListError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(None);
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(Some(Mutation::Moved { from, to }))
    }

    /// Drag-and-drop reorder: move `active_id` to where `over_id` sits
    pub fn reorder_by_id(&mut self, active_id: &str, over_id: &str) -> Option<Mutation> {
        if active_id == over_id {
            return None;
        }
        let from = self.position(active_id)?;
        let to = self.position(over_id)?;
        // Both positions come from the current sequence
        self.reorder(from, to).ok().flatten()
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
