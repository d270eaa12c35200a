//! Process-wide connectivity state, rebuilt from the store on every start.

use serde::{Deserialize, Serialize};

use super::SyncSummary;

/// What the UI status indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusBanner {
    Offline { pending: usize },
    Syncing { pending: usize },
    Pending { count: usize },
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectivityState {
    pub is_online: bool,
    pub pending_count: usize,
    pub is_syncing: bool,
    pub last_sync_result: Option<SyncSummary>,
}

impl ConnectivityState {
    pub fn new(is_online: bool, pending_count: usize) -> Self {
        Self {
            is_online,
            pending_count,
            is_syncing: false,
            last_sync_result: None,
        }
    }

    pub fn banner(&self) -> StatusBanner {
        if !self.is_online {
            StatusBanner::Offline {
                pending: self.pending_count,
            }
        } else if self.is_syncing {
            StatusBanner::Syncing {
                pending: self.pending_count,
            }
        } else if self.pending_count > 0 {
            StatusBanner::Pending {
                count: self.pending_count,
            }
        } else {
            StatusBanner::Idle
        }
    }
}
