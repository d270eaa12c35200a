//! Mutations removed from the queue without reaching the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MutationRecord;

/// Why a queued mutation was given up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    /// The server answered with a 4xx; replaying again cannot succeed.
    ClientError { status: u16 },
    /// The retry budget was spent on 5xx responses or missing responses.
    RetriesExhausted { attempts: u32 },
    /// The record could not be replayed at all, e.g. an unreadable payload.
    Rejected { message: String },
}

impl DropReason {
    pub fn describe(&self) -> String {
        match self {
            DropReason::ClientError { status } => format!("rejected by server (HTTP {status})"),
            DropReason::RetriesExhausted { attempts } => {
                format!("gave up after {attempts} attempts")
            }
            DropReason::Rejected { message } => format!("not replayable: {message}"),
        }
    }
}

/// A dead-letter entry, kept so dropped writes can be inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedMutation {
    pub record: MutationRecord,
    pub reason: DropReason,
    pub dropped_at: DateTime<Utc>,
}
