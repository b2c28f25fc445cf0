//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//!
//! # Invariants
//! - Returned connections have a busy timeout configured.
//! - Opening a file path creates the file when it is absent.
//! - Connections are released on drop; callers hold them only for the
//!   duration of one logical operation.

use super::DbResult;
use log::{debug, error};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a SQLite database file.
///
/// The schema is not touched here; see [`super::schema::ensure_schema`].
///
/// # Side effects
/// - Creates the database file if it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let path = path.as_ref();

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed path={} error={}",
                started_at.elapsed().as_millis(),
                path.display(),
                err
            );
            return Err(err.into());
        }
    };

    match configure_connection(&conn) {
        Ok(()) => {
            debug!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_configure_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

/// Opens an existing SQLite database file without creating it.
///
/// Used by read/write paths so that pointing a store at a missing file fails
/// instead of leaving an empty database behind.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_existing_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let path = path.as_ref();
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let conn = Connection::open_with_flags(path, flags)
        .and_then(|conn| configure_connection(&conn).map(|()| conn));
    match conn {
        Ok(conn) => {
            debug!(
                "event=db_open module=db status=ok mode=existing duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=existing duration_ms={} error_code=db_open_failed path={} error={}",
                started_at.elapsed().as_millis(),
                path.display(),
                err
            );
            Err(err.into())
        }
    }
}

/// Opens an in-memory SQLite database with the same pragmas as file mode.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    debug!("event=db_open module=db status=ok mode=memory");
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
}
