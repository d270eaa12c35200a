use serde::{Deserialize, Serialize};

/// Which replay path a pass took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPath {
    /// Nothing was pending; no network call was made.
    #[default]
    Empty,
    /// One batched request.
    Batch,
    /// Sequential individual replay after the batch endpoint was unavailable.
    Fallback,
}

/// Result of one synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncSummary {
    pub synced: usize,
    /// Records that did not succeed this pass, dropped or still queued.
    pub failed: usize,
    pub total: usize,
    /// Subset of `failed` that was removed from the queue.
    pub dropped: usize,
    pub path: SyncPath,
}

impl SyncSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Records left in the queue for a later pass.
    pub fn retained(&self) -> usize {
        self.failed.saturating_sub(self.dropped)
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
