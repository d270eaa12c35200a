// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "carequeue.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_MAX_DEAD_LETTERS: usize = 500;

// --- Sync ---
pub const DEFAULT_MAX_RETRIES: u32 = crate::constants::MAX_RETRIES;
pub const DEFAULT_BATCH_ENDPOINT: &str = "/sync/batch";
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 0; // disabled
pub const DEFAULT_SYNC_ON_RECONNECT: bool = true;
pub const DEFAULT_KEEP_DEAD_LETTERS: bool = true;

// --- Transport ---
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "carequeue=info";
pub const DEFAULT_JSON_LOGS: bool = false;

/// Project-level config file name.
pub const CONFIG_FILENAME: &str = "carequeue.toml";
