//! Process-level defaults for front ends.
//!
//! Nothing is read from files or the environment; front ends start from
//! [`AppConfig::default`] and may override fields.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Database file used when no other data source has been chosen.
pub const DEFAULT_DB_FILE_NAME: &str = "journi.db";
const LOG_DIR_NAME: &str = "journi-logs";

/// Startup configuration shared by the CLI and FFI front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Initial data source, relative to the working directory by default.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: &'static str,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: std::env::temp_dir().join(LOG_DIR_NAME),
        }
    }
}
