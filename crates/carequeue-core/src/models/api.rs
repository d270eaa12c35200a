//! Request/response shapes exchanged with the remote API.

use serde::{Deserialize, Serialize};

use super::{AuthContext, HttpMethod, MutationId};
use crate::constants::{QUEUED_MESSAGE, SYNTHETIC_QUEUED_STATUS};

/// An outgoing API call, addressed relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub auth: AuthContext,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            auth: AuthContext::default(),
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }
}

/// A received response, or the synthetic one handed back for a queued write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Set only on the synthetic response of a queued write.
    pub queued: Option<MutationId>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            queued: None,
        }
    }

    /// The soft-success answer for a write that was saved offline.
    pub fn queued(id: MutationId) -> Self {
        let body = serde_json::json!({
            "queued": true,
            "id": id,
            "message": QUEUED_MESSAGE,
        });
        Self {
            status: SYNTHETIC_QUEUED_STATUS,
            body: body.to_string().into_bytes(),
            queued: Some(id),
        }
    }

    pub fn is_queued(&self) -> bool {
        self.queued.is_some()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
