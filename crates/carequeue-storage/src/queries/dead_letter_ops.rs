//! Dead-letter log: move dropped mutations out of the queue, list, clear.

use chrono::Utc;
use rusqlite::{params, Connection};

use carequeue_core::errors::{CarequeueResult, QueueError};
use carequeue_core::models::{DropReason, DroppedMutation, MutationId};

use super::queue_ops::{self, RawRecord};
use super::{format_timestamp, parse_timestamp};
use crate::to_storage_err;

/// Move a queued row into `dropped_mutations` in one transaction, then
/// trim the log to its newest `keep` entries.
///
/// The row is copied column for column, so rows that no longer decode can
/// be buried too. The bearer token is not copied. Returns `false` when the
/// row was already gone.
pub fn bury(
    conn: &mut Connection,
    id: MutationId,
    reason: &DropReason,
    keep: usize,
) -> CarequeueResult<bool> {
    let reason_json = serde_json::to_string(reason).map_err(|e| to_storage_err(e.to_string()))?;
    let tx = conn
        .transaction()
        .map_err(|e| to_storage_err(format!("bury begin: {e}")))?;

    let copied = tx
        .execute(
            "INSERT INTO dropped_mutations (
                mutation_id, method, target, payload, payload_version, bearer_token,
                enqueued_at, attempts, reason, dropped_at
            )
            SELECT id, method, target, payload, payload_version, NULL,
                   enqueued_at, attempts, ?2, ?3
            FROM mutation_queue WHERE id = ?1",
            params![id.0, reason_json, format_timestamp(&Utc::now())],
        )
        .map_err(|e| to_storage_err(format!("bury {id}: {e}")))?;
    if copied == 0 {
        return Ok(false);
    }
    queue_ops::delete(&tx, id)?;

    let trimmed = tx
        .execute(
            "DELETE FROM dropped_mutations WHERE id NOT IN (
                SELECT id FROM dropped_mutations ORDER BY id DESC LIMIT ?1
            )",
            params![i64::try_from(keep).unwrap_or(i64::MAX)],
        )
        .map_err(|e| to_storage_err(format!("dead letter trim: {e}")))?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("bury commit: {e}")))?;
    if trimmed > 0 {
        tracing::debug!(trimmed, keep, "oldest dead letters discarded");
    }
    Ok(true)
}

/// Dropped mutations, oldest drop first. Entries that no longer decode
/// are skipped with a warning.
pub fn list(conn: &Connection) -> CarequeueResult<Vec<DroppedMutation>> {
    let mut stmt = conn
        .prepare(
            "SELECT mutation_id, method, target, payload, payload_version, bearer_token,
                    enqueued_at, attempts, reason, dropped_at
             FROM dropped_mutations ORDER BY dropped_at ASC, id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            let raw = RawRecord::from_row(row)?;
            let reason: String = row.get(8)?;
            let dropped_at: String = row.get(9)?;
            Ok((raw, reason, dropped_at))
        })
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut dropped = Vec::with_capacity(rows.len());
    for (raw, reason, dropped_at) in rows {
        let id = raw.id;
        match decode_entry(raw, &reason, &dropped_at) {
            Ok(entry) => dropped.push(entry),
            Err(e) => tracing::warn!(id, "dead letter unreadable: {e}"),
        }
    }
    Ok(dropped)
}

fn decode_entry(raw: RawRecord, reason: &str, dropped_at: &str) -> Result<DroppedMutation, QueueError> {
    let id = raw.id;
    let reason: DropReason = serde_json::from_str(reason).map_err(|e| QueueError::Corrupt {
        id,
        reason: format!("bad drop reason: {e}"),
    })?;
    Ok(DroppedMutation {
        record: raw.decode()?,
        reason,
        dropped_at: parse_timestamp(id, dropped_at)?,
    })
}

pub fn clear(conn: &Connection) -> CarequeueResult<usize> {
    conn.execute("DELETE FROM dropped_mutations", [])
        .map_err(|e| to_storage_err(format!("clear_dropped: {e}")))
}
