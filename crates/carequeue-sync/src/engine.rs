//! Synchronization engine: replays the durable queue against the remote API.
//!
//! One pass snapshots every pending record, submits them as a single batch,
//! and falls back to sequential individual replay when the batch endpoint
//! is unreachable or answers with anything other than a complete result
//! array. Both paths preserve enqueue order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use carequeue_core::config::SyncConfig;
use carequeue_core::errors::{CarequeueResult, SyncError};
use carequeue_core::models::{
    ApiRequest, DropReason, HttpMethod, MutationId, MutationRecord, SyncPath, SyncSummary,
};
use carequeue_core::traits::{DurableQueue, Transport};

use crate::events::{EventBus, QueueEvent};
use crate::transport::{BatchItem, BatchItemResult, BatchRequest, BatchResponse};

/// A record whose payload decoded, ready to go on the wire.
struct Replayable {
    record: MutationRecord,
    data: serde_json::Value,
}

/// Outcome of a single record within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Synced,
    Retained,
    Dropped,
}

/// Clears the running flag when a pass ends, including on early return.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncEngine {
    queue: Arc<dyn DurableQueue>,
    transport: Arc<dyn Transport>,
    events: EventBus,
    config: SyncConfig,
    running: AtomicBool,
}

impl SyncEngine {
    pub fn new(
        queue: Arc<dyn DurableQueue>,
        transport: Arc<dyn Transport>,
        events: EventBus,
        config: SyncConfig,
    ) -> Self {
        Self {
            queue,
            transport,
            events,
            config,
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one synchronization pass.
    ///
    /// Individual record failures are aggregated into the summary. Only
    /// persistence failures and a second concurrent call
    /// (`SyncError::AlreadyRunning`) are returned as errors.
    pub async fn run_sync(&self) -> CarequeueResult<SyncSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SyncError::AlreadyRunning.into());
        }
        let _guard = RunningGuard(&self.running);

        let (summary, removed) = self.pass().await?;

        if removed > 0 {
            self.events.publish(QueueEvent::QueueChanged);
        }
        self.events.publish(QueueEvent::SyncComplete(summary));
        Ok(summary)
    }

    /// Returns the summary and how many records left the queue.
    async fn pass(&self) -> CarequeueResult<(SyncSummary, usize)> {
        let snapshot = self.queue.snapshot().await?;
        let mut summary = SyncSummary {
            total: snapshot.len(),
            ..SyncSummary::empty()
        };
        if snapshot.is_empty() {
            tracing::debug!("sync pass skipped: queue empty");
            return Ok((summary, 0));
        }

        tracing::info!(pending = snapshot.len(), "sync pass started");

        for row in &snapshot.unreadable {
            let reason = DropReason::Rejected {
                message: row.reason.clone(),
            };
            self.drop_row(row.id, "unreadable row", reason).await?;
            summary.failed += 1;
            summary.dropped += 1;
        }

        let mut replayable = Vec::with_capacity(snapshot.records.len());
        for record in snapshot.records {
            match record.payload.to_json() {
                Ok(data) => replayable.push(Replayable { record, data }),
                Err(e) => {
                    let reason = DropReason::Rejected {
                        message: format!("payload does not decode: {e}"),
                    };
                    self.drop_record(&record, reason).await?;
                    summary.failed += 1;
                    summary.dropped += 1;
                }
            }
        }

        let outcomes = if replayable.is_empty() {
            Vec::new()
        } else {
            match self.submit_batch(&replayable).await {
                Some(results) => {
                    summary.path = SyncPath::Batch;
                    self.apply_batch_results(&replayable, &results).await?
                }
                None => {
                    summary.path = SyncPath::Fallback;
                    self.replay_sequentially(&replayable).await?
                }
            }
        };

        for outcome in &outcomes {
            match outcome {
                ItemOutcome::Synced => summary.synced += 1,
                ItemOutcome::Retained => summary.failed += 1,
                ItemOutcome::Dropped => {
                    summary.failed += 1;
                    summary.dropped += 1;
                }
            }
        }

        tracing::info!(
            synced = summary.synced,
            failed = summary.failed,
            dropped = summary.dropped,
            total = summary.total,
            path = ?summary.path,
            "sync pass finished"
        );

        Ok((summary, summary.synced + summary.dropped))
    }

    /// Submit every record in one request. `None` means the batch endpoint
    /// is unavailable and the caller should replay individually.
    async fn submit_batch(&self, items: &[Replayable]) -> Option<Vec<BatchItemResult>> {
        let batch = BatchRequest {
            requests: items
                .iter()
                .map(|item| BatchItem {
                    method: item.record.method.to_http(),
                    url: item.record.target.clone(),
                    data: item.data.clone(),
                })
                .collect(),
        };
        let body = match serde_json::to_value(&batch) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("batch body did not serialize, replaying individually: {e}");
                return None;
            }
        };

        // The most recent action carries the freshest credentials.
        let auth = items
            .last()
            .map(|item| item.record.auth.clone())
            .unwrap_or_default();
        let request = ApiRequest::new(HttpMethod::Post, self.config.batch_endpoint.as_str())
            .with_body(body)
            .with_auth(auth);

        match self.transport.send(&request).await {
            Ok(response) => match BatchResponse::from_api_response(&response, items.len()) {
                Ok(results) => Some(results),
                Err(e) => {
                    tracing::warn!("batch endpoint unusable, replaying individually: {e}");
                    None
                }
            },
            Err(e) => {
                tracing::warn!("batch endpoint unreachable, replaying individually: {e}");
                None
            }
        }
    }

    async fn apply_batch_results(
        &self,
        items: &[Replayable],
        results: &[BatchItemResult],
    ) -> CarequeueResult<Vec<ItemOutcome>> {
        let mut outcomes = Vec::with_capacity(items.len());
        for (item, result) in items.iter().zip(results) {
            let record = &item.record;
            let outcome = if result.success {
                self.queue.remove(record.id).await?;
                tracing::debug!(id = %record.id, target = %record.target, "batch item synced");
                ItemOutcome::Synced
            } else {
                tracing::debug!(
                    id = %record.id,
                    status = ?result.status,
                    error = result.error.as_deref().unwrap_or(""),
                    "batch item failed"
                );
                self.record_failure(record).await?
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn replay_sequentially(&self, items: &[Replayable]) -> CarequeueResult<Vec<ItemOutcome>> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            outcomes.push(self.replay_one(item).await?);
        }
        Ok(outcomes)
    }

    async fn replay_one(&self, item: &Replayable) -> CarequeueResult<ItemOutcome> {
        let record = &item.record;
        let mut request = ApiRequest::new(record.method.to_http(), record.target.as_str())
            .with_auth(record.auth.clone());
        if !item.data.is_null() {
            request = request.with_body(item.data.clone());
        }

        match self.transport.send(&request).await {
            Ok(response) if response.is_success() => {
                self.queue.remove(record.id).await?;
                tracing::debug!(id = %record.id, status = response.status, "replayed");
                Ok(ItemOutcome::Synced)
            }
            Ok(response) if response.is_client_error() => {
                let reason = DropReason::ClientError {
                    status: response.status,
                };
                self.drop_record(record, reason).await?;
                Ok(ItemOutcome::Dropped)
            }
            Ok(response) => {
                tracing::debug!(id = %record.id, status = response.status, "replay failed");
                self.record_failure(record).await
            }
            Err(e) => {
                tracing::debug!(id = %record.id, "replay got no response: {e}");
                self.record_failure(record).await
            }
        }
    }

    /// Spend one attempt of the retry budget; drop the record once it is gone.
    async fn record_failure(&self, record: &MutationRecord) -> CarequeueResult<ItemOutcome> {
        let attempts = record.attempts.saturating_add(1);
        if attempts >= self.config.max_retries {
            self.drop_record(record, DropReason::RetriesExhausted { attempts })
                .await?;
            return Ok(ItemOutcome::Dropped);
        }
        self.queue.set_attempts(record.id, attempts).await?;
        Ok(ItemOutcome::Retained)
    }

    async fn drop_record(&self, record: &MutationRecord, reason: DropReason) -> CarequeueResult<()> {
        let what = format!("{} {}", record.method, record.target);
        self.drop_row(record.id, &what, reason).await
    }

    async fn drop_row(&self, id: MutationId, what: &str, reason: DropReason) -> CarequeueResult<()> {
        tracing::warn!(id = %id, mutation = what, "dropping queued mutation: {}", reason.describe());
        if self.config.keep_dead_letters {
            self.queue.bury(id, reason).await
        } else {
            self.queue.remove(id).await
        }
    }
}
