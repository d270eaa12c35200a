//! # carequeue-sync
//!
//! Offline-first write path for the billing API client. Failed writes are
//! captured by the [`WriteInterceptor`] into the durable queue, replayed by
//! the [`SyncEngine`] (one batch request first, sequential replay as the
//! fallback), and scheduled by the [`ConnectivityCoordinator`] on reconnect
//! or on demand.

pub mod client;
pub mod coordinator;
pub mod engine;
pub mod events;
pub mod interceptor;
pub mod telemetry;
pub mod transport;

pub use client::OfflineClient;
pub use coordinator::{ConnectivityCoordinator, ConnectivitySignal};
pub use engine::SyncEngine;
pub use events::{EventBus, QueueEvent};
pub use interceptor::WriteInterceptor;
pub use transport::{HttpTransport, BATCH_PROTOCOL_VERSION};
