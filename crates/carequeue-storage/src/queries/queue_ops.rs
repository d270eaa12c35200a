//! Append, snapshot, count, remove, and attempt updates for queued mutations.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use carequeue_core::errors::{CarequeueResult, QueueError};
use carequeue_core::models::{
    AuthContext, MutationId, MutationMethod, MutationRecord, NewMutation, Payload, QueueSnapshot,
    UnreadableRecord,
};

use super::{format_timestamp, parse_timestamp};
use crate::to_storage_err;

const SELECT_COLUMNS: &str =
    "id, method, target, payload, payload_version, bearer_token, enqueued_at, attempts";

/// Undecoded row; converted outside the rusqlite closure so decode
/// failures become `QueueError::Corrupt` instead of SQLite errors.
pub(crate) struct RawRecord {
    pub id: i64,
    pub method: String,
    pub target: String,
    pub payload: Vec<u8>,
    pub payload_version: u32,
    pub bearer_token: Option<String>,
    pub enqueued_at: String,
    pub attempts: u32,
}

impl RawRecord {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            method: row.get(1)?,
            target: row.get(2)?,
            payload: row.get(3)?,
            payload_version: row.get(4)?,
            bearer_token: row.get(5)?,
            enqueued_at: row.get(6)?,
            attempts: row.get(7)?,
        })
    }

    pub(crate) fn decode(self) -> Result<MutationRecord, QueueError> {
        let method: MutationMethod = self
            .method
            .parse()
            .map_err(|reason| QueueError::Corrupt { id: self.id, reason })?;
        Ok(MutationRecord {
            id: MutationId(self.id),
            method,
            target: self.target,
            payload: Payload {
                schema_version: self.payload_version,
                bytes: self.payload,
            },
            auth: AuthContext {
                bearer_token: self.bearer_token,
            },
            enqueued_at: parse_timestamp(self.id, &self.enqueued_at)?,
            attempts: self.attempts,
        })
    }
}

/// Insert a new record with zero attempts. Returns the assigned id.
pub fn insert(conn: &Connection, mutation: &NewMutation) -> CarequeueResult<MutationId> {
    let enqueued_at = mutation.enqueued_at.unwrap_or_else(Utc::now);
    conn.execute(
        "INSERT INTO mutation_queue (
            method, target, payload, payload_version, bearer_token, enqueued_at, attempts
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
        params![
            mutation.method.as_str(),
            mutation.target,
            mutation.payload.bytes,
            mutation.payload.schema_version,
            mutation.auth.bearer_token,
            format_timestamp(&enqueued_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("append: {e}")))?;
    Ok(MutationId(conn.last_insert_rowid()))
}

/// Every pending row, oldest first.
///
/// The full result set is collected before returning, so callers hold a
/// snapshot that later appends cannot disturb. A row that fails to decode
/// is reported in `unreadable` and does not hide the others.
pub fn list_all(conn: &Connection) -> CarequeueResult<QueueSnapshot> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM mutation_queue ORDER BY enqueued_at ASC, id ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let raw = stmt
        .query_map([], RawRecord::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut snapshot = QueueSnapshot::default();
    for row in raw {
        let id = row.id;
        match row.decode() {
            Ok(record) => snapshot.records.push(record),
            Err(e) => {
                tracing::warn!(id, "queued mutation unreadable: {e}");
                snapshot.unreadable.push(UnreadableRecord {
                    id: MutationId(id),
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(snapshot)
}

pub fn get(conn: &Connection, id: MutationId) -> CarequeueResult<Option<MutationRecord>> {
    let raw = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM mutation_queue WHERE id = ?1"),
            params![id.0],
            RawRecord::from_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(raw.map(RawRecord::decode).transpose()?)
}

pub fn count(conn: &Connection) -> CarequeueResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM mutation_queue", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n.max(0) as usize)
}

/// Returns whether a row was deleted.
pub fn delete(conn: &Connection, id: MutationId) -> CarequeueResult<bool> {
    let changed = conn
        .execute("DELETE FROM mutation_queue WHERE id = ?1", params![id.0])
        .map_err(|e| to_storage_err(format!("remove {id}: {e}")))?;
    Ok(changed > 0)
}

/// Attempts never decrease; a lower value leaves the stored count as is.
pub fn update_attempts(conn: &Connection, id: MutationId, attempts: u32) -> CarequeueResult<bool> {
    let changed = conn
        .execute(
            "UPDATE mutation_queue SET attempts = MAX(attempts, ?2) WHERE id = ?1",
            params![id.0, attempts],
        )
        .map_err(|e| to_storage_err(format!("set_attempts {id}: {e}")))?;
    Ok(changed > 0)
}

pub fn delete_all(conn: &Connection) -> CarequeueResult<usize> {
    conn.execute("DELETE FROM mutation_queue", [])
        .map_err(|e| to_storage_err(format!("clear: {e}")))
}
