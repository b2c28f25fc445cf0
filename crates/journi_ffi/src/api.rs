//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the list/detail journal flow to Dart via FRB.
//! - Turn core errors into status messages the UI can show as-is.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One journal session exists per process; calls are serialized by a mutex.
//! - A failed call leaves the session in its previous state.

use journi_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, initialize,
    ping as ping_inner, AppConfig, CacheError, Screen, SqliteEntryStore, ViewController,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

type Session = ViewController<SqliteEntryStore>;

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// List position affected by the action, when there is one.
    pub index: Option<u32>,
    /// Status-bar message for the UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, index: Option<u32>) -> Self {
        Self {
            ok: true,
            index,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            index: None,
            message: message.into(),
        }
    }
}

/// List screen snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    /// Formatted rows (`YYYY-MM-DD - abstract`).
    pub rows: Vec<String>,
    /// Highlighted row on the list screen.
    pub cursor: Option<u32>,
    pub message: String,
}

/// Detail screen snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetail {
    pub index: u32,
    pub entry_id: i64,
    /// Read-only header, e.g. `2017-07-14 (Fri)`.
    pub date_label: String,
    /// Current (possibly unsaved) content.
    pub content: String,
}

/// Response for calls that show the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailResponse {
    pub ok: bool,
    pub entry: Option<EntryDetail>,
    pub message: String,
}

/// Opens the journal session on `db_path` (default `journi.db`).
///
/// The database is initialized first, so a new file gets an empty journal.
/// Re-opening replaces the previous session.
#[flutter_rust_bridge::frb(sync)]
pub fn session_open(db_path: Option<String>) -> ActionResponse {
    let path = match db_path.map(|raw| raw.trim().to_string()) {
        Some(raw) if raw.is_empty() => {
            return ActionResponse::failure("session_open failed: empty database path")
        }
        Some(raw) => PathBuf::from(raw),
        None => AppConfig::default().db_path,
    };

    let opened = initialize(path.clone())
        .map_err(CacheError::from)
        .and_then(|()| ViewController::open(SqliteEntryStore::new(path.clone())));
    match opened {
        Ok(controller) => {
            let count = controller.cache().count();
            *lock_session() = Some(controller);
            ActionResponse::success(
                format!("Opened {} ({count} entries).", path.display()),
                None,
            )
        }
        Err(err) => ActionResponse::failure(format!("session_open failed: {err}")),
    }
}

/// Returns the formatted list rows.
#[flutter_rust_bridge::frb(sync)]
pub fn list_rows() -> ListResponse {
    let listed = with_session(|session| {
        let cursor = match session.screen() {
            Screen::List { cursor } => (*cursor).and_then(to_u32),
            Screen::Detail(view) => to_u32(view.index),
        };
        Ok((session.rows(), cursor))
    });
    match listed {
        Ok((rows, cursor)) => {
            let message = if rows.is_empty() {
                "No entries.".to_string()
            } else {
                format!("{} entries.", rows.len())
            };
            ListResponse {
                rows,
                cursor,
                message,
            }
        }
        Err(message) => ListResponse {
            rows: Vec::new(),
            cursor: None,
            message,
        },
    }
}

/// Opens the entry at `index` on the detail screen.
///
/// `None` means the user pressed "Go" without a highlighted row.
#[flutter_rust_bridge::frb(sync)]
pub fn select_entry(index: Option<u32>) -> DetailResponse {
    let selected = with_session(|session| {
        let opened = session.select(index.map(|value| value as usize))?;
        Ok((opened, current_detail(session)))
    });
    match selected {
        Ok((true, entry)) => DetailResponse {
            ok: true,
            entry,
            message: String::new(),
        },
        Ok((false, entry)) => DetailResponse {
            ok: false,
            message: if entry.is_some() {
                "An entry is already open.".to_string()
            } else {
                "No entries selected".to_string()
            },
            entry,
        },
        Err(message) => DetailResponse {
            ok: false,
            entry: None,
            message,
        },
    }
}

/// Returns the open entry, if the detail screen is active.
#[flutter_rust_bridge::frb(sync)]
pub fn current_entry() -> DetailResponse {
    match with_session(|session| Ok(current_detail(session))) {
        Ok(Some(entry)) => DetailResponse {
            ok: true,
            entry: Some(entry),
            message: String::new(),
        },
        Ok(None) => DetailResponse {
            ok: false,
            entry: None,
            message: "No entry is open.".to_string(),
        },
        Err(message) => DetailResponse {
            ok: false,
            entry: None,
            message,
        },
    }
}

/// Replaces the unsaved content of the open entry.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_entry(content: String) -> ActionResponse {
    match with_session(|session| Ok(session.edit(content))) {
        Ok(true) => ActionResponse::success("", None),
        Ok(false) => ActionResponse::failure("No entry is open."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Saves the open entry and keeps it open.
#[flutter_rust_bridge::frb(sync)]
pub fn save_entry() -> ActionResponse {
    let saved = with_session(|session| {
        let saved = session.save()?;
        Ok(saved.then(|| session.detail().and_then(|view| to_u32(view.index))))
    });
    match saved {
        Ok(Some(index)) => ActionResponse::success("Entry saved.", index),
        Ok(None) => ActionResponse::failure("No entry is open."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Returns to the list screen, discarding unsaved edits.
#[flutter_rust_bridge::frb(sync)]
pub fn close_entry() -> ActionResponse {
    match with_session(|session| Ok(session.back())) {
        Ok(true) => ActionResponse::success("", None),
        Ok(false) => ActionResponse::failure("No entry is open."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Appends an empty entry dated now and highlights it in the list.
#[flutter_rust_bridge::frb(sync)]
pub fn new_entry() -> ActionResponse {
    match with_session(|session| Ok(session.new_entry()?)) {
        Ok(Some(index)) => ActionResponse::success("Entry created.", to_u32(index)),
        Ok(None) => ActionResponse::failure("Close the open entry first."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Switches the active database to an existing file.
#[flutter_rust_bridge::frb(sync)]
pub fn set_data_source(path: String) -> ActionResponse {
    let path = path.trim().to_string();
    match with_session(|session| Ok(session.set_data_source(&path)?)) {
        Ok(true) => ActionResponse::success(format!("Changed active DB to: {path}"), None),
        Ok(false) => ActionResponse::success("Didn't change the active DB", None),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Creates `<name>.db` next to the active database and switches to it.
#[flutter_rust_bridge::frb(sync)]
pub fn create_data_source(name: String) -> ActionResponse {
    match with_session(|session| Ok(session.create_data_source(&name)?)) {
        Ok(path) => ActionResponse::success(format!("Created new DB: {}", path.display()), None),
        Err(message) => ActionResponse::failure(message),
    }
}

fn lock_session() -> MutexGuard<'static, Option<Session>> {
    // A panic inside a previous call must not brick the UI.
    SESSION.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, CacheError>) -> Result<T, String> {
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return Err("No journal is open; call session_open first.".to_string());
    };
    f(session).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error error={err}");
        err.to_string()
    })
}

fn current_detail(session: &Session) -> Option<EntryDetail> {
    session.detail().and_then(|view| {
        Some(EntryDetail {
            index: to_u32(view.index)?,
            entry_id: view.id,
            date_label: view.date_label.clone(),
            content: view.draft.clone(),
        })
    })
}

fn to_u32(index: usize) -> Option<u32> {
    u32::try_from(index).ok()
}
