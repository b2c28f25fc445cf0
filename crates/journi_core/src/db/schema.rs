//! Fixed `entries` table definition.

use super::DbResult;
use rusqlite::Connection;

/// Name of the only table owned by Journi.
pub const ENTRIES_TABLE: &str = "entries";

const CREATE_ENTRIES_SQL: &str = "CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY,
    date INTEGER NOT NULL,
    content TEXT
);";

/// Creates the `entries` table if it is missing. Existing rows are untouched.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_ENTRIES_SQL)?;
    Ok(())
}

/// Returns whether the `entries` table exists on this connection.
pub fn has_entries_table(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [ENTRIES_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
