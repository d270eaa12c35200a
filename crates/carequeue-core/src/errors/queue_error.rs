use super::error_code::{self, ErrorCode};

/// Durable queue errors.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("persistence failed: {reason}")]
    Persistence { reason: String },

    #[error("queued mutation {id} not found")]
    NotFound { id: i64 },

    #[error("queued mutation {id} is unreadable: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },
}

impl ErrorCode for QueueError {
    fn error_code(&self) -> &'static str {
        match self {
            QueueError::Persistence { .. } => error_code::PERSISTENCE_ERROR,
            QueueError::NotFound { .. } => error_code::RECORD_NOT_FOUND,
            QueueError::Corrupt { .. } => error_code::RECORD_CORRUPT,
            QueueError::Migration { .. } => error_code::MIGRATION_FAILED,
        }
    }
}
