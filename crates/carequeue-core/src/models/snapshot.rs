//! Point-in-time view of the queue used by a synchronization pass.

use serde::{Deserialize, Serialize};

use super::{MutationId, MutationRecord};

/// A stored row that could not be turned back into a `MutationRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableRecord {
    pub id: MutationId,
    pub reason: String,
}

/// Every pending row, oldest first, split into readable and unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub records: Vec<MutationRecord>,
    pub unreadable: Vec<UnreadableRecord>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.records.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.unreadable.is_empty()
    }
}
