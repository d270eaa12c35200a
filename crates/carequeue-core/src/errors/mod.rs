//! Error handling for carequeue.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod queue_error;
pub mod sync_error;
pub mod transport_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use queue_error::QueueError;
pub use sync_error::SyncError;
pub use transport_error::TransportError;

/// Top-level error for all carequeue operations.
#[derive(Debug, thiserror::Error)]
pub enum CarequeueError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CarequeueResult<T> = Result<T, CarequeueError>;

impl CarequeueError {
    /// Whether this is the durable-store failure that must never be hidden.
    pub fn is_persistence(&self) -> bool {
        matches!(self, CarequeueError::Queue(QueueError::Persistence { .. }))
    }

    /// Whether no response reached the client for the failed call.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, CarequeueError::Transport(_))
    }
}

impl ErrorCode for CarequeueError {
    fn error_code(&self) -> &'static str {
        match self {
            CarequeueError::Queue(e) => e.error_code(),
            CarequeueError::Transport(e) => e.error_code(),
            CarequeueError::Sync(e) => e.error_code(),
            CarequeueError::Config(e) => e.error_code(),
            CarequeueError::Serialization(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}
