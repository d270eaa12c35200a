use async_trait::async_trait;

use crate::errors::CarequeueResult;
use crate::models::{
    DropReason, DroppedMutation, MutationId, MutationRecord, NewMutation, QueueSnapshot,
};

/// Durable, ordered, client-local store of queued mutations.
///
/// Every operation resolves or fails; none may hang or block the caller's
/// executor thread. Persistence failures surface as `QueueError::Persistence`.
#[async_trait]
pub trait DurableQueue: Send + Sync {
    /// Persist a mutation and return its newly assigned id.
    async fn append(&self, mutation: NewMutation) -> CarequeueResult<MutationId>;

    /// Every pending row, oldest `enqueued_at` first. Rows that no longer
    /// decode are reported in `unreadable` instead of failing the read.
    async fn snapshot(&self) -> CarequeueResult<QueueSnapshot>;

    /// Readable pending records, oldest `enqueued_at` first.
    async fn list_all(&self) -> CarequeueResult<Vec<MutationRecord>> {
        Ok(self.snapshot().await?.records)
    }

    async fn count(&self) -> CarequeueResult<usize>;

    /// Remove a record. Removing an unknown id is a no-op.
    async fn remove(&self, id: MutationId) -> CarequeueResult<()>;

    /// Persist a new attempt count. Unknown ids are a no-op.
    async fn set_attempts(&self, id: MutationId, attempts: u32) -> CarequeueResult<()>;

    async fn clear(&self) -> CarequeueResult<()>;

    // --- Dead letters ---

    /// Atomically remove a record and keep it with the reason it was dropped.
    /// Works on unreadable rows too. The stored credentials are not kept.
    async fn bury(&self, id: MutationId, reason: DropReason) -> CarequeueResult<()>;

    /// Dropped mutations, oldest drop first.
    async fn list_dropped(&self) -> CarequeueResult<Vec<DroppedMutation>>;

    async fn clear_dropped(&self) -> CarequeueResult<()>;
}
