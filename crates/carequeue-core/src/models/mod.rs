//! Data model shared by every carequeue component.

pub mod api;
pub mod connectivity;
pub mod dead_letter;
pub mod mutation;
pub mod snapshot;
pub mod sync_summary;

pub use api::{ApiRequest, ApiResponse};
pub use connectivity::{ConnectivityState, StatusBanner};
pub use dead_letter::{DropReason, DroppedMutation};
pub use mutation::{
    AuthContext, HttpMethod, MutationId, MutationMethod, MutationRecord, NewMutation, Payload,
};
pub use snapshot::{QueueSnapshot, UnreadableRecord};
pub use sync_summary::{SyncPath, SyncSummary};
