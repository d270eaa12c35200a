//! Transport layer: reqwest HTTP client and the batch replay wire format.

pub mod http_client;
pub mod protocol;

pub use http_client::HttpTransport;
pub use protocol::{BatchItem, BatchItemResult, BatchRequest, BatchResponse, BATCH_PROTOCOL_VERSION};
