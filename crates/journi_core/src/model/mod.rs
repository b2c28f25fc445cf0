//! Domain model for journal entries.
//!
//! # Invariants
//! - Entries are identified by a store-assigned integer id.
//! - There is no deletion; entries only grow in number.

pub mod entry;
