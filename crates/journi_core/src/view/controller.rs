//! Two-screen navigation for the journal (entry list and entry detail).
//!
//! # Responsibility
//! - Track which screen is active and which entry is open or highlighted.
//! - Translate user actions into entry cache calls.
//!
//! # Invariants
//! - The controller starts on the list screen after an initial refresh.
//! - Unsaved detail edits live only in `DetailView::draft` and are dropped by
//!   `back()`.
//! - `save()` never leaves the detail screen.
//! - Only entry content is editable; the creation date is shown read-only.

use crate::model::entry::EntryId;
use crate::repo::entry_repo::{self, EntryStore, SqliteEntryStore};
use crate::service::entry_cache::{CacheError, CacheResult, EntryCache};
use crate::view::display::{format_detail_date, format_row};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Extension appended to names passed to [`ViewController::create_data_source`].
pub const DATA_SOURCE_EXTENSION: &str = "db";

static DATA_SOURCE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w][\w\- .]*$").expect("valid data source name regex"));

pub type ControllerResult<T> = CacheResult<T>;

/// State of the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Cache position of the open entry.
    pub index: usize,
    /// Store id of the open entry.
    pub id: EntryId,
    /// Read-only header, e.g. `2017-07-14 (Fri)`.
    pub date_label: String,
    /// Editable content, persisted only by `save()`.
    pub draft: String,
}

/// Active screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Entry list with an optional highlighted row.
    List { cursor: Option<usize> },
    /// One entry opened for editing.
    Detail(DetailView),
}

/// List/detail state machine driving an [`EntryCache`].
pub struct ViewController<S: EntryStore> {
    cache: EntryCache<S>,
    screen: Screen,
}

impl<S: EntryStore> ViewController<S> {
    /// Loads the cache from `store` and starts on the list screen.
    pub fn open(store: S) -> ControllerResult<Self> {
        Ok(Self::from_cache(EntryCache::open(store)?))
    }

    /// Wraps an already loaded cache.
    pub fn from_cache(cache: EntryCache<S>) -> Self {
        Self {
            cache,
            screen: Screen::List { cursor: None },
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn cache(&self) -> &EntryCache<S> {
        &self.cache
    }

    /// Open detail view, if any.
    pub fn detail(&self) -> Option<&DetailView> {
        match &self.screen {
            Screen::Detail(view) => Some(view),
            Screen::List { .. } => None,
        }
    }

    /// Formatted list rows, one per cached entry.
    pub fn rows(&self) -> Vec<String> {
        self.cache
            .entries()
            .iter()
            .map(|entry| format_row(entry.date, &entry.content))
            .collect()
    }

    /// Opens the entry at `index` on the detail screen.
    ///
    /// Returns `Ok(false)` and stays on the list when nothing is selected, and
    /// when called from the detail screen.
    ///
    /// # Errors
    /// - `IndexOutOfRange` for a stale selection; the list screen is kept.
    pub fn select(&mut self, index: Option<usize>) -> ControllerResult<bool> {
        if let Screen::Detail(_) = self.screen {
            return Ok(false);
        }
        let Some(index) = index else {
            info!("event=view_select module=view status=no_selection");
            return Ok(false);
        };

        let entry = self.cache.get(index)?;
        let view = DetailView {
            index,
            id: entry.id,
            date_label: format_detail_date(entry.date),
            draft: entry.content.clone(),
        };
        debug!(
            "event=view_select module=view status=ok entry_id={} index={index}",
            view.id
        );
        self.screen = Screen::Detail(view);
        Ok(true)
    }

    /// Leaves the detail screen, discarding unsaved edits.
    ///
    /// The list cursor is placed on the entry that was open.
    pub fn back(&mut self) -> bool {
        let Screen::Detail(view) = &self.screen else {
            return false;
        };
        let index = view.index;
        self.screen = Screen::List {
            cursor: Some(index),
        };
        true
    }

    /// Replaces the detail draft. Returns `false` on the list screen.
    pub fn edit(&mut self, content: impl Into<String>) -> bool {
        match &mut self.screen {
            Screen::Detail(view) => {
                view.draft = content.into();
                true
            }
            Screen::List { .. } => false,
        }
    }

    /// Persists the detail draft and stays on the detail screen.
    ///
    /// Returns `Ok(false)` on the list screen. On failure the draft is kept so
    /// the user can retry.
    pub fn save(&mut self) -> ControllerResult<bool> {
        let (index, draft) = match &self.screen {
            Screen::Detail(view) => (view.index, view.draft.clone()),
            Screen::List { .. } => return Ok(false),
        };
        self.cache.set_content(index, draft)?;
        debug!("event=view_save module=view status=ok index={index}");
        Ok(true)
    }

    /// Appends an empty entry stamped with the current time.
    pub fn new_entry(&mut self) -> ControllerResult<Option<usize>> {
        self.new_entry_at(chrono::Local::now().timestamp())
    }

    /// Appends an empty entry stamped with `date` and highlights it.
    ///
    /// Stays on the list screen. Returns `Ok(None)` from the detail screen.
    pub fn new_entry_at(&mut self, date: i64) -> ControllerResult<Option<usize>> {
        if let Screen::Detail(_) = self.screen {
            debug!("event=view_new_entry module=view status=skipped screen=detail");
            return Ok(None);
        }
        let index = self.cache.add(date, String::new())?;
        self.screen = Screen::List {
            cursor: Some(index),
        };
        Ok(Some(index))
    }

    /// Switches the database file; on a change the list screen is shown
    /// without a highlighted row.
    pub fn set_data_source(&mut self, path: impl AsRef<Path>) -> ControllerResult<bool> {
        let changed = self.cache.set_data_source(path)?;
        if changed {
            self.screen = Screen::List { cursor: None };
        }
        Ok(changed)
    }
}

impl ViewController<SqliteEntryStore> {
    /// Creates `<name>.db` next to the active database, initializes it and
    /// makes it the active data source.
    ///
    /// # Errors
    /// - `InvalidDataSource` when `name` is empty or not a plain file stem.
    /// - `Store` when the file cannot be created.
    pub fn create_data_source(&mut self, name: &str) -> ControllerResult<PathBuf> {
        let name = name.trim();
        if !DATA_SOURCE_NAME_RE.is_match(name) {
            return Err(CacheError::InvalidDataSource(name.to_string()));
        }

        let directory = self
            .cache
            .data_source()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let path = directory.join(format!("{name}.{DATA_SOURCE_EXTENSION}"));

        entry_repo::initialize(path.clone())?;
        self.set_data_source(&path)?;
        info!("event=data_source_create module=view status=ok");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{Screen, ViewController};
    use crate::repo::entry_repo::{EntryStore, SqliteEntryStore};
    use crate::service::entry_cache::CacheError;

    fn controller_in(dir: &tempfile::TempDir) -> ViewController<SqliteEntryStore> {
        let store = SqliteEntryStore::new(dir.path().join("journi.db"));
        store.initialize().unwrap();
        ViewController::open(store).unwrap()
    }

    #[test]
    fn starts_on_list_without_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(&dir);
        assert_eq!(controller.screen(), &Screen::List { cursor: None });
        assert!(controller.rows().is_empty());
    }

    #[test]
    fn create_data_source_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller_in(&dir);

        for name in ["", "   ", "../escape", "a/b", ".hidden"] {
            let err = controller.create_data_source(name).unwrap_err();
            assert!(matches!(err, CacheError::InvalidDataSource(_)), "{name}");
        }
    }

    #[test]
    fn create_data_source_initializes_and_switches() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller_in(&dir);
        controller.new_entry_at(1).unwrap();

        let path = controller.create_data_source("work log").unwrap();
        assert_eq!(path, dir.path().join("work log.db"));
        assert!(path.exists());
        assert_eq!(controller.cache().data_source(), path.as_path());
        assert_eq!(controller.cache().count(), 0);
        assert_eq!(controller.screen(), &Screen::List { cursor: None });
    }
}
