use journi_core::db::open_db;
use journi_core::db::schema::has_entries_table;
use journi_core::{initialize, Entry, EntryStore, SqliteEntryStore, StoreError};
use std::path::PathBuf;

fn db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("journi.db")
}

#[test]
fn initialize_creates_file_and_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    assert!(!path.exists());

    initialize(path.clone()).unwrap();

    assert!(path.exists());
    let conn = open_db(&path).unwrap();
    assert!(has_entries_table(&conn).unwrap());
}

#[test]
fn initialize_twice_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteEntryStore::new(db_path(&dir));
    store.initialize().unwrap();
    store.insert(1_500_000_000, "kept").unwrap();

    store.initialize().unwrap();
    store.initialize().unwrap();

    let entries = store.list_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "kept");
}

#[test]
fn insert_assigns_increasing_ids_and_list_keeps_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteEntryStore::new(db_path(&dir));
    store.initialize().unwrap();

    let first = store.insert(300, "first").unwrap();
    let second = store.insert(100, "second").unwrap();
    let third = store.insert(200, "").unwrap();
    assert!(first < second && second < third);

    let entries = store.list_all().unwrap();
    assert_eq!(
        entries,
        vec![
            Entry::new(first, 300, "first"),
            Entry::new(second, 100, "second"),
            Entry::new(third, 200, ""),
        ]
    );
}

#[test]
fn update_content_rewrites_only_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteEntryStore::new(db_path(&dir));
    store.initialize().unwrap();
    let id = store.insert(42, "draft").unwrap();

    assert!(store.update_content(id, "final").unwrap());

    let entries = store.list_all().unwrap();
    assert_eq!(entries, vec![Entry::new(id, 42, "final")]);
}

#[test]
fn update_content_of_missing_id_is_a_silent_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteEntryStore::new(db_path(&dir));
    store.initialize().unwrap();
    let id = store.insert(1, "untouched").unwrap();

    // Deliberately not an error: the missing row is reported as `false`.
    let updated = store.update_content(id + 100, "ghost").unwrap();
    assert!(!updated);

    let entries = store.list_all().unwrap();
    assert_eq!(entries, vec![Entry::new(id, 1, "untouched")]);
}

#[test]
fn list_all_on_missing_file_is_storage_unavailable_and_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let store = SqliteEntryStore::new(path.clone());

    let err = store.list_all().unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable(_)));
    assert!(!path.exists());
}

#[test]
fn list_all_without_table_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    drop(open_db(&path).unwrap());

    let err = SqliteEntryStore::new(path).list_all().unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable(_)));
}

#[test]
fn insert_into_missing_directory_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteEntryStore::new(dir.path().join("nope").join("journi.db"));

    assert!(matches!(
        store.initialize().unwrap_err(),
        StoreError::StorageUnavailable(_)
    ));
    assert!(matches!(
        store.insert(1, "x").unwrap_err(),
        StoreError::StorageUnavailable(_)
    ));
}

#[test]
fn switch_data_source_only_changes_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteEntryStore::new(db_path(&dir));
    let other = dir.path().join("other.db");

    store.switch_data_source(other.clone());

    assert_eq!(store.data_source(), other.as_path());
    assert!(!other.exists());
}
