//! Configuration system for carequeue.
//! TOML-based, 3-layer resolution: env > project file > defaults.

pub mod carequeue_config;
pub mod defaults;
pub mod observability_config;
pub mod storage_config;
pub mod sync_config;
pub mod transport_config;

pub use carequeue_config::CarequeueConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;
pub use sync_config::SyncConfig;
pub use transport_config::TransportConfig;
