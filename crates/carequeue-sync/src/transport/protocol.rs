//! Batch replay wire format for `POST /sync/batch`.

use serde::{Deserialize, Serialize};

use carequeue_core::errors::SyncError;
use carequeue_core::models::{ApiResponse, HttpMethod};

/// Sent as the `x-carequeue-batch-version` header.
pub const BATCH_PROTOCOL_VERSION: &str = "1";

/// All pending mutations, in enqueue order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<BatchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub method: HttpMethod,
    /// Resource path relative to the API base.
    pub url: String,
    pub data: serde_json::Value,
}

/// `results` is aligned positionally with `BatchRequest::requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItemResult>,
    #[serde(default)]
    pub synced: usize,
    #[serde(default)]
    pub failed: usize,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub success: bool,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BatchResponse {
    /// Accept a response only if it is 2xx, decodes, and covers every request.
    pub fn from_api_response(
        response: &ApiResponse,
        expected: usize,
    ) -> Result<Vec<BatchItemResult>, SyncError> {
        if !response.is_success() {
            return Err(SyncError::MalformedBatchResponse {
                reason: format!("HTTP {}", response.status),
            });
        }
        let parsed: BatchResponse =
            response
                .json()
                .map_err(|e| SyncError::MalformedBatchResponse {
                    reason: e.to_string(),
                })?;
        if parsed.results.len() != expected {
            return Err(SyncError::MalformedBatchResponse {
                reason: format!(
                    "expected {expected} results, got {}",
                    parsed.results.len()
                ),
            });
        }
        Ok(parsed.results)
    }
}
