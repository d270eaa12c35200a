//! QueueStore: owns the write connection, runs migrations at open,
//! implements `DurableQueue`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::Connection;

use carequeue_core::config::StorageConfig;
use carequeue_core::errors::CarequeueResult;
use carequeue_core::models::{
    DropReason, DroppedMutation, MutationId, MutationRecord, NewMutation, QueueSnapshot,
};
use carequeue_core::traits::DurableQueue;

use crate::migrations;
use crate::pool::pragmas::apply_pragmas;
use crate::pool::WriteConnection;
use crate::queries::{dead_letter_ops, queue_ops};
use crate::to_storage_err;

/// SQLite-backed durable mutation queue.
pub struct QueueStore {
    writer: WriteConnection,
    path: Option<PathBuf>,
    max_dead_letters: usize,
}

impl QueueStore {
    /// Open a queue backed by a file on disk with default settings.
    pub fn open(path: &Path) -> CarequeueResult<Self> {
        let config = StorageConfig {
            db_path: path.display().to_string(),
            ..StorageConfig::default()
        };
        Self::open_with_config(&config)
    }

    /// Open the queue described by a storage config.
    pub fn open_with_config(config: &StorageConfig) -> CarequeueResult<Self> {
        let path = PathBuf::from(&config.db_path);
        let conn = Connection::open(&path).map_err(|e| to_storage_err(e.to_string()))?;
        let store = Self::initialize(conn, config, true, Some(path))?;
        tracing::info!(path = %config.db_path, "opened mutation queue");
        Ok(store)
    }

    /// Open an in-memory queue (for testing).
    pub fn open_in_memory() -> CarequeueResult<Self> {
        Self::open_in_memory_with_config(&StorageConfig::default())
    }

    /// Open an in-memory queue with explicit settings. `db_path` is ignored.
    pub fn open_in_memory_with_config(config: &StorageConfig) -> CarequeueResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn, config, false, None)
    }

    /// Apply pragmas and migrations before the connection is shared.
    fn initialize(
        conn: Connection,
        config: &StorageConfig,
        file_backed: bool,
        path: Option<PathBuf>,
    ) -> CarequeueResult<Self> {
        apply_pragmas(&conn, config, file_backed)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            writer: WriteConnection::new(conn),
            path,
            max_dead_letters: config.max_dead_letters.max(1),
        })
    }

    /// Database file, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current schema version.
    pub async fn schema_version(&self) -> CarequeueResult<u32> {
        self.writer
            .with_conn(|conn| migrations::current_version(conn))
            .await
    }

    /// Fetch one pending record.
    pub async fn get(&self, id: MutationId) -> CarequeueResult<Option<MutationRecord>> {
        self.writer.with_conn(move |conn| queue_ops::get(conn, id)).await
    }
}

#[async_trait]
impl DurableQueue for QueueStore {
    async fn append(&self, mutation: NewMutation) -> CarequeueResult<MutationId> {
        let id = self
            .writer
            .with_conn(move |conn| queue_ops::insert(conn, &mutation))
            .await?;
        tracing::debug!(id = %id, "queued mutation persisted");
        Ok(id)
    }

    async fn snapshot(&self) -> CarequeueResult<QueueSnapshot> {
        self.writer.with_conn(|conn| queue_ops::list_all(conn)).await
    }

    async fn count(&self) -> CarequeueResult<usize> {
        self.writer.with_conn(|conn| queue_ops::count(conn)).await
    }

    async fn remove(&self, id: MutationId) -> CarequeueResult<()> {
        let removed = self
            .writer
            .with_conn(move |conn| queue_ops::delete(conn, id))
            .await?;
        if !removed {
            tracing::debug!(id = %id, "remove: record already gone");
        }
        Ok(())
    }

    async fn set_attempts(&self, id: MutationId, attempts: u32) -> CarequeueResult<()> {
        self.writer
            .with_conn(move |conn| queue_ops::update_attempts(conn, id, attempts))
            .await?;
        Ok(())
    }

    async fn clear(&self) -> CarequeueResult<()> {
        let removed = self.writer.with_conn(|conn| queue_ops::delete_all(conn)).await?;
        tracing::info!(removed, "mutation queue cleared");
        Ok(())
    }

    async fn bury(&self, id: MutationId, reason: DropReason) -> CarequeueResult<()> {
        let keep = self.max_dead_letters;
        let buried = self
            .writer
            .with_conn(move |conn| dead_letter_ops::bury(conn, id, &reason, keep))
            .await?;
        if !buried {
            tracing::debug!(id = %id, "bury: record already gone");
        }
        Ok(())
    }

    async fn list_dropped(&self) -> CarequeueResult<Vec<DroppedMutation>> {
        self.writer.with_conn(|conn| dead_letter_ops::list(conn)).await
    }

    async fn clear_dropped(&self) -> CarequeueResult<()> {
        self.writer
            .with_conn(|conn| dead_letter_ops::clear(conn))
            .await?;
        Ok(())
    }
}
