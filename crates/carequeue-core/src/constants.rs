/// Replay attempts a record may consume before it is dropped.
pub const MAX_RETRIES: u32 = 3;

/// Encoding version stamped on every queued payload blob.
/// Version 1: UTF-8 JSON bytes, empty for bodiless requests.
pub const PAYLOAD_SCHEMA_VERSION: u32 = 1;

/// HTTP status reported to callers when a write was queued instead of delivered.
pub const SYNTHETIC_QUEUED_STATUS: u16 = 202;

/// Human-readable message carried by the synthetic queued response.
pub const QUEUED_MESSAGE: &str = "Saved offline; will sync when connection is restored";

/// Crate version, embedded in the transport user agent.
pub const CAREQUEUE_VERSION: &str = env!("CARGO_PKG_VERSION");
