use serde::{Deserialize, Serialize};

use super::defaults;

/// Synchronization engine and coordinator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Replay attempts before a record is dropped.
    pub max_retries: u32,
    /// Path of the batch replay endpoint, relative to the transport base URL.
    pub batch_endpoint: String,
    /// Periodic sync interval in seconds. 0 disables the timer.
    pub sync_interval_secs: u64,
    /// Run a pass automatically on an offline -> online transition.
    pub sync_on_reconnect: bool,
    /// Record dropped mutations for later inspection instead of discarding them.
    pub keep_dead_letters: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            batch_endpoint: defaults::DEFAULT_BATCH_ENDPOINT.to_string(),
            sync_interval_secs: defaults::DEFAULT_SYNC_INTERVAL_SECS,
            sync_on_reconnect: defaults::DEFAULT_SYNC_ON_RECONNECT,
            keep_dead_letters: defaults::DEFAULT_KEEP_DEAD_LETTERS,
        }
    }
}
