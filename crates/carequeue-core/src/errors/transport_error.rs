use super::error_code::{self, ErrorCode};

/// A call for which no HTTP response was received.
///
/// Any status code, including 4xx and 5xx, is a response and never
/// becomes a `TransportError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("server unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("request could not be built: {reason}")]
    InvalidRequest { reason: String },
}

impl ErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            TransportError::Unreachable { .. } => error_code::TRANSPORT_FAILURE,
            TransportError::Timeout { .. } => error_code::TRANSPORT_TIMEOUT,
            TransportError::InvalidRequest { .. } => error_code::INVALID_REQUEST,
        }
    }
}
