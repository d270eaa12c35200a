use super::error_code::{self, ErrorCode};

/// Synchronization pass errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("a synchronization pass is already running")]
    AlreadyRunning,

    #[error("batch response rejected: {reason}")]
    MalformedBatchResponse { reason: String },
}

impl ErrorCode for SyncError {
    fn error_code(&self) -> &'static str {
        match self {
            SyncError::AlreadyRunning => error_code::SYNC_IN_PROGRESS,
            SyncError::MalformedBatchResponse { .. } => error_code::SYNC_ERROR,
        }
    }
}
