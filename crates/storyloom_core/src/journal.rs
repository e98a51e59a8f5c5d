//! Read-only boundary type for the external journal store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A journal entry as exposed by the external journal store.
///
/// This core only reads entries; it never creates or mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct JournalEntry {
    /// Stable entry identity in the journal store
    id: String,
    /// Entry text
    content: String,
    /// When the entry was written
    date: DateTime<Utc>,
}

impl JournalEntry {
    /// Create an entry view.
    pub fn new(id: impl Into<String>, content: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            date,
        }
    }
}
