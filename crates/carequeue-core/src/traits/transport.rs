use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::{ApiRequest, ApiResponse};

/// Sends one request to the remote API.
///
/// `Ok` carries any response the server produced, whatever its status.
/// `Err` means no response arrived at all (DNS failure, refused
/// connection, timeout).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
