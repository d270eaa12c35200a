//! Shared fakes for sync tests: a scripted transport and a queue that cannot persist.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use carequeue_core::errors::{CarequeueResult, QueueError, TransportError};
use carequeue_core::models::*;
use carequeue_core::traits::{DurableQueue, Transport};

pub const BATCH_PATH: &str = "/sync/batch";

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync;

/// Transport that records every request and answers from a handler.
pub struct FakeTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<ApiRequest>>,
    online: AtomicBool,
    delay: Option<Duration>,
}

impl FakeTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
            online: AtomicBool::new(true),
            delay: None,
        }
    }

    /// Batch succeeds for every item; individual calls answer 200.
    pub fn healthy() -> Self {
        Self::new(|req| {
            if req.path == BATCH_PATH {
                Ok(batch_all(req, true))
            } else {
                Ok(ApiResponse::new(200, b"{}".to_vec()))
            }
        })
    }

    /// Batch endpoint missing from the network; individual calls answer `status`.
    pub fn batch_unreachable(status: u16) -> Self {
        Self::new(move |req| {
            if req.path == BATCH_PATH {
                Err(unreachable())
            } else {
                Ok(ApiResponse::new(status, Vec::new()))
            }
        })
    }

    /// No response to anything.
    pub fn dead() -> Self {
        Self::new(|_| Err(unreachable()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// While offline every call fails without a response and is not recorded.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    pub fn batch_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.path == BATCH_PATH).count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(unreachable());
        }
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(request)
    }
}

pub fn unreachable() -> TransportError {
    TransportError::Unreachable {
        reason: "connection refused".to_string(),
    }
}

/// Items in a batch request body.
pub fn batch_items(req: &ApiRequest) -> Vec<serde_json::Value> {
    req.body
        .as_ref()
        .and_then(|b| b.get("requests"))
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default()
}

/// A well-formed batch response with every item set to `success`.
pub fn batch_all(req: &ApiRequest, success: bool) -> ApiResponse {
    let n = batch_items(req).len();
    let results: Vec<_> = (0..n).map(|_| json!({ "success": success })).collect();
    let synced = if success { n } else { 0 };
    let body = json!({
        "results": results,
        "synced": synced,
        "failed": n - synced,
        "total": n,
    });
    ApiResponse::new(200, body.to_string().into_bytes())
}

pub fn mutation(method: MutationMethod, target: &str, body: serde_json::Value) -> NewMutation {
    NewMutation::new(method, target, Payload::from_json(&body).unwrap())
        .with_auth(AuthContext::bearer("tok-1"))
}

/// Queue whose writes always fail, as with a full disk.
#[derive(Default)]
pub struct FullQueue;

fn full() -> carequeue_core::CarequeueError {
    QueueError::Persistence {
        reason: "database or disk is full".to_string(),
    }
    .into()
}

#[async_trait]
impl DurableQueue for FullQueue {
    async fn append(&self, _mutation: NewMutation) -> CarequeueResult<MutationId> {
        Err(full())
    }

    async fn snapshot(&self) -> CarequeueResult<QueueSnapshot> {
        Ok(QueueSnapshot::default())
    }

    async fn count(&self) -> CarequeueResult<usize> {
        Ok(0)
    }

    async fn remove(&self, _id: MutationId) -> CarequeueResult<()> {
        Err(full())
    }

    async fn set_attempts(&self, _id: MutationId, _attempts: u32) -> CarequeueResult<()> {
        Err(full())
    }

    async fn clear(&self) -> CarequeueResult<()> {
        Err(full())
    }

    async fn bury(&self, _id: MutationId, _reason: DropReason) -> CarequeueResult<()> {
        Err(full())
    }

    async fn list_dropped(&self) -> CarequeueResult<Vec<DroppedMutation>> {
        Ok(Vec::new())
    }

    async fn clear_dropped(&self) -> CarequeueResult<()> {
        Err(full())
    }
}
