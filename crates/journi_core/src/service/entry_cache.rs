//! Session-scoped entry cache.
//!
//! # Responsibility
//! - Hold a materialized copy of the store rows for display.
//! - Route content edits and new entries to the store, keeping both sides in
//!   step without full reloads.
//!
//! # Invariants
//! - After `refresh()`, position *i* equals the store row at ordinal *i*.
//! - `add()` appends in the same order a later `refresh()` would produce.
//! - A failed store write or source switch leaves the cache as it was.

use crate::model::entry::Entry;
use crate::repo::entry_repo::{EntryStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type CacheResult<T> = Result<T, CacheError>;

/// Error for cache use-cases.
#[derive(Debug)]
pub enum CacheError {
    /// Requested position is outside `[0, count)`.
    IndexOutOfRange { index: usize, count: usize },
    /// Data source path was empty.
    InvalidDataSource(String),
    /// Store failure, passed through unchanged.
    Store(StoreError),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => {
                write!(f, "entry index {index} out of range (count {count})")
            }
            Self::InvalidDataSource(value) => write!(f, "invalid data source: `{value}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CacheError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// In-memory view of one entry store.
pub struct EntryCache<S: EntryStore> {
    store: S,
    entries: Vec<Entry>,
}

impl<S: EntryStore> EntryCache<S> {
    /// Creates an empty cache. Call [`EntryCache::refresh`] before reading.
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: Vec::new(),
        }
    }

    /// Creates a cache and loads it from the store.
    pub fn open(store: S) -> CacheResult<Self> {
        let mut cache = Self::new(store);
        cache.refresh()?;
        Ok(cache)
    }

    /// Replaces all cached rows with the store's current rows.
    ///
    /// Cached rows are kept when the store read fails.
    pub fn refresh(&mut self) -> CacheResult<()> {
        let entries = self.store.list_all()?;
        debug!(
            "event=cache_refresh module=cache status=ok count={}",
            entries.len()
        );
        self.entries = entries;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> CacheResult<&Entry> {
        self.entries.get(index).ok_or(CacheError::IndexOutOfRange {
            index,
            count: self.entries.len(),
        })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn data_source(&self) -> &Path {
        self.store.data_source()
    }

    /// Replaces the content of the cached entry at `index` and persists it.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when `index` is not cached.
    /// - `Store` when the write fails; the cached content is restored first.
    pub fn set_content(&mut self, index: usize, new_content: impl Into<String>) -> CacheResult<()> {
        let count = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(CacheError::IndexOutOfRange { index, count })?;

        let previous = std::mem::replace(&mut entry.content, new_content.into());
        match self.store.update_content(entry.id, &entry.content) {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(
                    "event=cache_set_content module=cache status=not_found entry_id={} index={index}",
                    entry.id
                );
                Ok(())
            }
            Err(err) => {
                entry.content = previous;
                Err(err.into())
            }
        }
    }

    /// Inserts a new entry and appends it to the cache tail.
    ///
    /// Returns the cache index of the new entry.
    pub fn add(&mut self, date: i64, content: impl Into<String>) -> CacheResult<usize> {
        let content = content.into();
        let id = self.store.insert(date, &content)?;
        self.entries.push(Entry { id, date, content });
        debug!("event=cache_add module=cache status=ok entry_id={id}");
        Ok(self.entries.len() - 1)
    }

    /// Inserts `count` empty entries in one store transaction, then reloads.
    pub fn add_blank(&mut self, count: usize, date: i64) -> CacheResult<()> {
        if count == 0 {
            return Ok(());
        }
        self.store.insert_blank(count, date)?;
        self.refresh()
    }

    /// Switches the backing database file.
    ///
    /// Returns `false` without touching the cache when `new_path` is already
    /// the active source. On a switch the cache is reloaded from the new file.
    ///
    /// # Errors
    /// - `InvalidDataSource` for an empty path.
    /// - `Store` when the new source cannot be read; the previous source and
    ///   rows stay active.
    pub fn set_data_source(&mut self, new_path: impl AsRef<Path>) -> CacheResult<bool> {
        let new_path = new_path.as_ref();
        if new_path.to_string_lossy().trim().is_empty() {
            return Err(CacheError::InvalidDataSource(
                new_path.to_string_lossy().into_owned(),
            ));
        }
        if new_path == self.store.data_source() {
            return Ok(false);
        }

        let previous = self.store.data_source().to_path_buf();
        self.store.switch_data_source(new_path.to_path_buf());
        if let Err(err) = self.refresh() {
            self.store.switch_data_source(previous);
            return Err(err);
        }

        info!(
            "event=data_source_switch module=cache status=ok count={}",
            self.entries.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheError, EntryCache};
    use crate::model::entry::{Entry, EntryId};
    use crate::repo::entry_repo::{EntryStore, StoreError, StoreResult};
    use std::cell::{Cell, RefCell};
    use std::path::{Path, PathBuf};

    /// Store double whose writes can be made to fail.
    struct MemoryStore {
        path: PathBuf,
        rows: RefCell<Vec<Entry>>,
        fail_writes: Cell<bool>,
        list_calls: Cell<usize>,
    }

    impl MemoryStore {
        fn with_rows(rows: Vec<Entry>) -> Self {
            Self {
                path: PathBuf::from("memory.db"),
                rows: RefCell::new(rows),
                fail_writes: Cell::new(false),
                list_calls: Cell::new(0),
            }
        }

        fn unavailable() -> StoreError {
            StoreError::InvalidData("simulated write failure".to_string())
        }
    }

    impl EntryStore for MemoryStore {
        fn data_source(&self) -> &Path {
            &self.path
        }

        fn switch_data_source(&mut self, path: PathBuf) {
            self.path = path;
        }

        fn initialize(&self) -> StoreResult<()> {
            Ok(())
        }

        fn list_all(&self) -> StoreResult<Vec<Entry>> {
            self.list_calls.set(self.list_calls.get() + 1);
            if self.path.ends_with("missing.db") {
                return Err(Self::unavailable());
            }
            Ok(self.rows.borrow().clone())
        }

        fn insert(&self, date: i64, content: &str) -> StoreResult<EntryId> {
            if self.fail_writes.get() {
                return Err(Self::unavailable());
            }
            let mut rows = self.rows.borrow_mut();
            let id = rows.last().map_or(1, |entry| entry.id + 1);
            rows.push(Entry::new(id, date, content));
            Ok(id)
        }

        fn update_content(&self, id: EntryId, content: &str) -> StoreResult<bool> {
            if self.fail_writes.get() {
                return Err(Self::unavailable());
            }
            let mut rows = self.rows.borrow_mut();
            match rows.iter_mut().find(|entry| entry.id == id) {
                Some(entry) => {
                    entry.content = content.to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn insert_blank(&self, count: usize, date: i64) -> StoreResult<Vec<EntryId>> {
            (0..count).map(|_| self.insert(date, "")).collect()
        }
    }

    fn seeded_cache() -> EntryCache<MemoryStore> {
        EntryCache::open(MemoryStore::with_rows(vec![
            Entry::new(1, 100, "one"),
            Entry::new(2, 200, "two"),
        ]))
        .unwrap()
    }

    #[test]
    fn failed_write_rolls_back_cached_content() {
        let mut cache = seeded_cache();
        cache.store().fail_writes.set(true);

        let err = cache.set_content(1, "lost edit").unwrap_err();
        assert!(matches!(err, CacheError::Store(_)));
        assert_eq!(cache.get(1).unwrap().content, "two");
    }

    #[test]
    fn failed_insert_leaves_cache_untouched() {
        let mut cache = seeded_cache();
        cache.store().fail_writes.set(true);

        assert!(cache.add(300, "three").is_err());
        assert_eq!(cache.count(), 2);
    }

    #[test]
    fn set_content_with_stale_id_is_not_an_error() {
        let mut cache = seeded_cache();
        cache.store().rows.borrow_mut().retain(|entry| entry.id != 2);

        cache.set_content(1, "edited").unwrap();
        assert_eq!(cache.get(1).unwrap().content, "edited");
    }

    #[test]
    fn same_data_source_skips_refresh() {
        let mut cache = seeded_cache();
        let calls_before = cache.store().list_calls.get();

        assert!(!cache.set_data_source("memory.db").unwrap());
        assert_eq!(cache.store().list_calls.get(), calls_before);
    }

    #[test]
    fn empty_data_source_is_rejected() {
        let mut cache = seeded_cache();

        let err = cache.set_data_source("  ").unwrap_err();
        assert!(matches!(err, CacheError::InvalidDataSource(_)));
        assert_eq!(cache.data_source(), Path::new("memory.db"));
        assert_eq!(cache.count(), 2);
    }

    #[test]
    fn unreadable_data_source_restores_previous_source() {
        let mut cache = seeded_cache();

        assert!(cache.set_data_source("missing.db").is_err());
        assert_eq!(cache.data_source(), Path::new("memory.db"));
        assert_eq!(cache.count(), 2);
    }

    #[test]
    fn add_blank_zero_is_a_no_op() {
        let mut cache = seeded_cache();
        let calls_before = cache.store().list_calls.get();

        cache.add_blank(0, 1).unwrap();
        assert_eq!(cache.count(), 2);
        assert_eq!(cache.store().list_calls.get(), calls_before);
    }
}
