use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::CAREQUEUE_VERSION;

/// HTTP transport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// API base URL; queued targets are relative to it.
    pub base_url: String,
    /// Per-request timeout in milliseconds. A timed-out call counts as "no response".
    pub timeout_ms: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            timeout_ms: defaults::DEFAULT_TIMEOUT_MS,
            user_agent: format!("carequeue/{CAREQUEUE_VERSION}"),
        }
    }
}
