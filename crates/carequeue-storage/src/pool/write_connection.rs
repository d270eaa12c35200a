//! Single write connection behind `tokio::sync::Mutex`.
//! Serialized writes; the SQLite work itself runs on the blocking pool.

use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use carequeue_core::errors::CarequeueResult;

use crate::to_storage_err;

/// A single connection protected by an async mutex.
pub struct WriteConnection {
    conn: Arc<Mutex<Connection>>,
}

impl WriteConnection {
    /// Wrap an already configured and migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Acquire the connection and run `f` off the async executor.
    ///
    /// The lock is held until `f` returns, so each call sees a consistent
    /// database and calls are applied in acquisition order.
    pub async fn with_conn<F, T>(&self, f: F) -> CarequeueResult<T>
    where
        F: FnOnce(&mut Connection) -> CarequeueResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = Arc::clone(&self.conn).lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut guard))
            .await
            .map_err(|e| to_storage_err(format!("storage task failed: {e}")))?
    }
}
