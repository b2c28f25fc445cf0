//! Journal entry domain model.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `date` is the creation time and is never rewritten after insert.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type EntryId = i64;

/// One journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Auto-increment id from the `entries` table.
    pub id: EntryId,
    /// Creation time, seconds since Unix epoch.
    pub date: i64,
    /// Free text body. May be empty.
    pub content: String,
}

impl Entry {
    pub fn new(id: EntryId, date: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            date,
            content: content.into(),
        }
    }
}
