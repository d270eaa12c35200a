//! # carequeue-storage
//!
//! SQLite persistence for the offline mutation queue. One write connection,
//! versioned migrations, FIFO queue table, and a dead-letter table for
//! mutations that were given up on.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::QueueStore;

use carequeue_core::errors::{CarequeueError, QueueError};

/// Convert a storage failure message into the persistence error callers must see.
pub fn to_storage_err(reason: impl Into<String>) -> CarequeueError {
    QueueError::Persistence {
        reason: reason.into(),
    }
    .into()
}
