//! # carequeue-core
//!
//! Foundation crate for the carequeue offline mutation queue.
//! Defines the queued-mutation model, the storage and transport traits,
//! errors, config, and constants. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CarequeueConfig;
pub use errors::{CarequeueError, CarequeueResult};
pub use models::{
    ApiRequest, ApiResponse, AuthContext, ConnectivityState, HttpMethod, MutationId,
    MutationMethod, MutationRecord, NewMutation, Payload, SyncSummary,
};
pub use traits::{DurableQueue, Transport};
