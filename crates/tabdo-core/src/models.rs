//! Data models for tabdo
//!
//! An [`Item`] is one to-do entry. Its JSON form is the wire format of the
//! remote list document:
//!
//! ```text
//! { "id": "1718000000000", "text": "buy milk", "priority": "high", "done": false }
//! ```
//!
//! Documents written by older clients only carry `id` and `text`; the
//! missing fields fall back to their defaults. The edit-mode flag is
//! view-local and never travels over the wire.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Item priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid priority '{0}'. Use low, normal or high.")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A single to-do entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Unique within its list, stable for the item's lifetime
    pub id: String,
    /// User-supplied content
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub done: bool,
    /// In-place edit mode (view state, not persisted)
    #[serde(skip)]
    pub editing: bool,
}

impl Item {
    /// Create a new, not-done item
    pub fn new(id: impl Into<String>, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            priority,
            done: false,
            editing: false,
        }
    }

    /// Creation time, recovered from a timestamp id
    ///
    /// Returns `None` for ids that are not millisecond timestamps.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.id.parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

/// Decode a remote list document
///
/// A missing (`null`), non-array or otherwise malformed document decodes
/// to an empty sequence rather than an error.
pub fn decode_items(body: &[u8]) -> Vec<Item> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    match serde_json::from_slice::<Option<Vec<Item>>>(body) {
        Ok(items) => items.unwrap_or_default(),
        Err(e) => {
            warn!("Ignoring malformed list document: {}", e);
            Vec::new()
        }
    }
}

/// Encode a list document for the remote store
pub fn encode_items(items: &[Item]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(items)
}
