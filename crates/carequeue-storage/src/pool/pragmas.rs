//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use carequeue_core::config::StorageConfig;
use carequeue_core::errors::CarequeueResult;

use crate::to_storage_err;

/// Apply durability and locking pragmas.
///
/// WAL is only requested for file-backed databases; in-memory databases
/// keep their default journal.
pub fn apply_pragmas(conn: &Connection, config: &StorageConfig, file_backed: bool) -> CarequeueResult<()> {
    if file_backed && config.wal_mode {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.busy_timeout(std::time::Duration::from_millis(u64::from(config.busy_timeout_ms)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> CarequeueResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
