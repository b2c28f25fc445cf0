//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the entry store contract consumed by the cache.
//! - Isolate SQLite query details from cache/controller orchestration.
//!
//! # Invariants
//! - Store APIs report I/O failures as `StorageUnavailable` and never retry.
//! - Updating a missing id is logged, not raised.

pub mod entry_repo;
