//! SQL for the queue and dead-letter tables.

pub mod dead_letter_ops;
pub mod queue_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use carequeue_core::errors::QueueError;

/// Fixed-width RFC 3339 so text order equals time order.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(id: i64, raw: &str) -> Result<DateTime<Utc>, QueueError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| QueueError::Corrupt {
            id,
            reason: format!("bad timestamp {raw:?}: {e}"),
        })
}
