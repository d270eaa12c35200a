//! Stable error codes for callers that cross a language boundary.

/// Every error enum implements this to provide a structured code string.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "PERSISTENCE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const PERSISTENCE_ERROR: &str = "PERSISTENCE_ERROR";
pub const RECORD_NOT_FOUND: &str = "RECORD_NOT_FOUND";
pub const RECORD_CORRUPT: &str = "RECORD_CORRUPT";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const TRANSPORT_FAILURE: &str = "TRANSPORT_FAILURE";
pub const TRANSPORT_TIMEOUT: &str = "TRANSPORT_TIMEOUT";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const SYNC_IN_PROGRESS: &str = "SYNC_IN_PROGRESS";
pub const SYNC_ERROR: &str = "SYNC_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
