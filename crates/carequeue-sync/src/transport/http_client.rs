//! HTTP transport over reqwest with a bounded per-request timeout.

use std::time::Duration;

use async_trait::async_trait;

use carequeue_core::config::TransportConfig;
use carequeue_core::errors::TransportError;
use carequeue_core::models::{ApiRequest, ApiResponse, HttpMethod};
use carequeue_core::traits::Transport;

use super::protocol::BATCH_PROTOCOL_VERSION;

/// Sends `ApiRequest`s to the configured API base URL.
///
/// No retries happen here: a missing response is reported straight back
/// so the interceptor can queue the write and the engine can count the attempt.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::InvalidRequest {
                reason: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                after_ms: self.config.timeout_ms,
            }
        } else if err.is_builder() {
            TransportError::InvalidRequest {
                reason: err.to_string(),
            }
        } else {
            TransportError::Unreachable {
                reason: err.to_string(),
            }
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut req = self
            .client
            .request(to_reqwest_method(request.method), &url)
            .header("x-request-id", &request_id)
            .header("x-carequeue-batch-version", BATCH_PROTOCOL_VERSION);
        if let Some(ref body) = request.body {
            req = req.json(body);
        }
        if let Some(ref token) = request.auth.bearer_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| {
            let err = self.classify(e);
            tracing::debug!(%url, %request_id, error = %err, "no response");
            err
        })?;

        let status = response.status().as_u16();
        // The server answered; a broken body must not turn this into "no response".
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!(%url, status, "response body unreadable: {e}");
                Vec::new()
            }
        };
        tracing::debug!(method = %request.method, %url, %request_id, status, "response");
        Ok(ApiResponse::new(status, body))
    }
}
