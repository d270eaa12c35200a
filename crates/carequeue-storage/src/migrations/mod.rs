//! Schema migrations using PRAGMA user_version.

pub mod v001_mutation_queue;
pub mod v002_dropped_mutations;

use rusqlite::Connection;

use carequeue_core::errors::{CarequeueResult, QueueError};

use crate::to_storage_err;

/// Latest schema version this build knows how to create.
pub const LATEST_VERSION: u32 = 2;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> CarequeueResult<()> {
    let current_version = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[
        (v001_mutation_queue::MIGRATION_SQL, 1),
        (v002_dropped_mutations::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql).map_err(|e| QueueError::Migration {
                version: *version,
                reason: e.to_string(),
            })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| QueueError::Migration {
                    version: *version,
                    reason: e.to_string(),
                })?;
            tracing::info!(version = version, "applied queue migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> CarequeueResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
