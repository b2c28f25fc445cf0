//! Entry store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist journal entries in the single `entries` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Reads return rows ordered by `id ASC`, i.e. insertion order.
//! - Every operation opens its own connection, commits once and releases the
//!   connection on every exit path (an uncommitted transaction rolls back on
//!   drop).
//! - `date` is written on insert only; updates touch `content` alone.

use crate::db::schema::ensure_schema;
use crate::db::{open_db, open_existing_db, DbError};
use crate::model::entry::{Entry, EntryId};
use log::{debug, error, warn};
use rusqlite::types::Value;
use rusqlite::{params, Row, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

const ENTRY_SELECT_SQL: &str = "SELECT id, date, content FROM entries ORDER BY id ASC;";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for entry persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// Database file cannot be opened, created, read or written.
    StorageUnavailable(DbError),
    /// A persisted row cannot be converted into an [`Entry`].
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageUnavailable(DbError::Sqlite(value))
    }
}

/// Persistence interface used by the entry cache.
pub trait EntryStore {
    /// Path of the database file currently backing this store.
    fn data_source(&self) -> &Path;
    /// Points the store at another database file. Performs no I/O.
    fn switch_data_source(&mut self, path: PathBuf);
    /// Creates the file and the `entries` table when absent.
    fn initialize(&self) -> StoreResult<()>;
    /// Returns every entry in insertion order.
    fn list_all(&self) -> StoreResult<Vec<Entry>>;
    /// Appends one entry and returns its new id.
    fn insert(&self, date: i64, content: &str) -> StoreResult<EntryId>;
    /// Rewrites `content` of one entry.
    ///
    /// Returns `Ok(false)` when no row has this id; that case is not an error.
    fn update_content(&self, id: EntryId, content: &str) -> StoreResult<bool>;
    /// Appends `count` empty entries stamped with `date` in one transaction.
    fn insert_blank(&self, count: usize, date: i64) -> StoreResult<Vec<EntryId>>;
}

/// SQLite-backed entry store bound to one database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteEntryStore {
    path: PathBuf,
}

impl SqliteEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Runs `f` inside one transaction on a fresh connection to an existing
    /// database file and commits it.
    fn with_transaction<T>(
        &self,
        event: &'static str,
        f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let result = (|| -> StoreResult<T> {
            let mut conn = open_existing_db(&self.path)?;
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })();

        match &result {
            Ok(_) => debug!(
                "event={event} module=store status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event={event} module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl EntryStore for SqliteEntryStore {
    fn data_source(&self) -> &Path {
        &self.path
    }

    fn switch_data_source(&mut self, path: PathBuf) {
        self.path = path;
    }

    fn initialize(&self) -> StoreResult<()> {
        let conn = open_db(&self.path)?;
        match ensure_schema(&conn) {
            Ok(()) => {
                debug!(
                    "event=store_init module=store status=ok path={}",
                    self.path.display()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_init module=store status=error path={} error={}",
                    self.path.display(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn list_all(&self) -> StoreResult<Vec<Entry>> {
        self.with_transaction("entry_list", |tx| {
            let mut stmt = tx.prepare(ENTRY_SELECT_SQL)?;
            let mut rows = stmt.query([])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(parse_entry_row(row)?);
            }
            Ok(entries)
        })
    }

    fn insert(&self, date: i64, content: &str) -> StoreResult<EntryId> {
        self.with_transaction("entry_insert", |tx| {
            tx.execute(
                "INSERT INTO entries (date, content) VALUES (?1, ?2);",
                params![date, content],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn update_content(&self, id: EntryId, content: &str) -> StoreResult<bool> {
        let changed = self.with_transaction("entry_update", |tx| {
            let changed = tx.execute(
                "UPDATE entries SET content = ?1 WHERE id = ?2;",
                params![content, id],
            )?;
            Ok(changed)
        })?;

        if changed == 0 {
            warn!("event=entry_update module=store status=not_found entry_id={id}");
            return Ok(false);
        }
        Ok(true)
    }

    fn insert_blank(&self, count: usize, date: i64) -> StoreResult<Vec<EntryId>> {
        self.with_transaction("entry_insert_blank", |tx| {
            let mut stmt = tx.prepare("INSERT INTO entries (date, content) VALUES (?1, '');")?;
            let mut ids = Vec::with_capacity(count);
            for _ in 0..count {
                stmt.execute([date])?;
                ids.push(tx.last_insert_rowid());
            }
            Ok(ids)
        })
    }
}

/// Creates the `entries` table at `path` if needed. Safe to call repeatedly.
pub fn initialize(path: impl Into<PathBuf>) -> StoreResult<()> {
    SqliteEntryStore::new(path).initialize()
}

fn parse_entry_row(row: &Row<'_>) -> StoreResult<Entry> {
    let id: EntryId = row.get("id")?;

    // Older databases hold fractional epoch seconds.
    let date = match row.get::<_, Value>("date")? {
        Value::Integer(value) => value,
        Value::Real(value) if value.is_finite() => value.trunc() as i64,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid date value `{other:?}` in entries.date for id {id}"
            )));
        }
    };

    let content = row.get::<_, Option<String>>("content")?.unwrap_or_default();

    Ok(Entry { id, date, content })
}
