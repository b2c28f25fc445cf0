//! Core domain logic for Journi, a single-user journal.
//! This crate owns entry persistence, the session cache and screen navigation;
//! front ends only render and forward user actions.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{AppConfig, DEFAULT_DB_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{Entry, EntryId};
pub use repo::entry_repo::{
    initialize, EntryStore, SqliteEntryStore, StoreError, StoreResult,
};
pub use service::entry_cache::{CacheError, CacheResult, EntryCache};
pub use view::controller::{ControllerResult, DetailView, Screen, ViewController};
pub use view::display::{format_abstract, format_date, format_detail_date, format_row};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
