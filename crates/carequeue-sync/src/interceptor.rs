//! Write interceptor: sends every API call, queues mutating calls that get
//! no response, and answers them with a synthetic "queued" response.

use std::sync::Arc;

use carequeue_core::errors::{CarequeueResult, TransportError};
use carequeue_core::models::{
    ApiRequest, ApiResponse, AuthContext, HttpMethod, MutationMethod, NewMutation, Payload,
};
use carequeue_core::traits::{DurableQueue, Transport};

use crate::events::{EventBus, QueueEvent};

/// Wraps outgoing calls to the remote API.
///
/// Responses of any status pass through untouched. Only a missing response
/// on POST/PUT/PATCH/DELETE is converted into a queued mutation.
#[derive(Clone)]
pub struct WriteInterceptor {
    queue: Arc<dyn DurableQueue>,
    transport: Arc<dyn Transport>,
    events: EventBus,
}

impl WriteInterceptor {
    pub fn new(queue: Arc<dyn DurableQueue>, transport: Arc<dyn Transport>, events: EventBus) -> Self {
        Self {
            queue,
            transport,
            events,
        }
    }

    /// Send one request.
    ///
    /// Returns the server's response, the synthetic 202 response when the
    /// write was queued, or the original `TransportError` when nothing was
    /// queued.
    pub async fn execute(&self, request: ApiRequest) -> CarequeueResult<ApiResponse> {
        let failure = match self.transport.send(&request).await {
            Ok(response) => return Ok(response),
            Err(failure) => failure,
        };

        if let TransportError::InvalidRequest { .. } = failure {
            // Built wrong on our side, not a connectivity failure.
            tracing::warn!(path = %request.path, "request not sent: {failure}");
            return Err(failure.into());
        }

        let Some(method) = MutationMethod::from_http(request.method) else {
            tracing::debug!(path = %request.path, "read failed without response; not queued");
            return Err(failure.into());
        };

        self.enqueue(method, request, failure).await
    }

    async fn enqueue(
        &self,
        method: MutationMethod,
        request: ApiRequest,
        failure: TransportError,
    ) -> CarequeueResult<ApiResponse> {
        let payload = match request.body.as_ref().map(Payload::from_json).transpose() {
            Ok(payload) => payload.unwrap_or_default(),
            Err(e) => {
                tracing::error!(path = %request.path, "cannot encode body for queueing: {e}");
                return Err(failure.into());
            }
        };
        let mutation = NewMutation::new(method, request.path.clone(), payload).with_auth(request.auth);

        match self.queue.append(mutation).await {
            Ok(id) => {
                tracing::info!(
                    id = %id,
                    method = %method,
                    path = %request.path,
                    reason = %failure,
                    "write saved offline"
                );
                self.events.publish(QueueEvent::QueueChanged);
                Ok(ApiResponse::queued(id))
            }
            Err(persist_err) => {
                // Never report a write as queued when it was not.
                tracing::error!(
                    path = %request.path,
                    transport_error = %failure,
                    "offline queue rejected write: {persist_err}"
                );
                Err(failure.into())
            }
        }
    }

    pub async fn get(&self, path: &str, auth: &AuthContext) -> CarequeueResult<ApiResponse> {
        self.execute(ApiRequest::new(HttpMethod::Get, path).with_auth(auth.clone()))
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        auth: &AuthContext,
    ) -> CarequeueResult<ApiResponse> {
        self.execute(
            ApiRequest::new(HttpMethod::Post, path)
                .with_body(body)
                .with_auth(auth.clone()),
        )
        .await
    }

    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
        auth: &AuthContext,
    ) -> CarequeueResult<ApiResponse> {
        self.execute(
            ApiRequest::new(HttpMethod::Put, path)
                .with_body(body)
                .with_auth(auth.clone()),
        )
        .await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
        auth: &AuthContext,
    ) -> CarequeueResult<ApiResponse> {
        self.execute(
            ApiRequest::new(HttpMethod::Patch, path)
                .with_body(body)
                .with_auth(auth.clone()),
        )
        .await
    }

    pub async fn delete(&self, path: &str, auth: &AuthContext) -> CarequeueResult<ApiResponse> {
        self.execute(ApiRequest::new(HttpMethod::Delete, path).with_auth(auth.clone()))
            .await
    }
}
