//! Wires the store, transport, interceptor, engine, and coordinator together.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use carequeue_core::config::CarequeueConfig;
use carequeue_core::errors::CarequeueResult;
use carequeue_core::models::{ApiRequest, ApiResponse, DroppedMutation};
use carequeue_core::traits::{DurableQueue, Transport};
use carequeue_storage::QueueStore;

use crate::coordinator::{ConnectivityCoordinator, ConnectivitySignal};
use crate::engine::SyncEngine;
use crate::events::EventBus;
use crate::interceptor::WriteInterceptor;
use crate::transport::HttpTransport;

/// Offline-capable API client.
///
/// Every component shares one queue and one event bus.
pub struct OfflineClient {
    queue: Arc<dyn DurableQueue>,
    events: EventBus,
    interceptor: WriteInterceptor,
    engine: Arc<SyncEngine>,
    coordinator: Arc<ConnectivityCoordinator>,
}

impl OfflineClient {
    /// Open the SQLite queue and the HTTP transport described by `config`.
    pub async fn from_config(config: &CarequeueConfig, initially_online: bool) -> CarequeueResult<Self> {
        let store = QueueStore::open_with_config(&config.storage)?;
        let transport = HttpTransport::new(config.transport.clone())?;
        Self::with_parts(Arc::new(store), Arc::new(transport), config, initially_online).await
    }

    /// Assemble a client around an existing queue and transport.
    pub async fn with_parts(
        queue: Arc<dyn DurableQueue>,
        transport: Arc<dyn Transport>,
        config: &CarequeueConfig,
        initially_online: bool,
    ) -> CarequeueResult<Self> {
        let events = EventBus::default();
        let interceptor =
            WriteInterceptor::new(Arc::clone(&queue), Arc::clone(&transport), events.clone());
        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&queue),
            transport,
            events.clone(),
            config.sync.clone(),
        ));
        let coordinator = ConnectivityCoordinator::start(
            Arc::clone(&engine),
            Arc::clone(&queue),
            events.clone(),
            config.sync.clone(),
            initially_online,
        )
        .await?;

        Ok(Self {
            queue,
            events,
            interceptor,
            engine,
            coordinator,
        })
    }

    /// Send a request through the write interceptor.
    pub async fn execute(&self, request: ApiRequest) -> CarequeueResult<ApiResponse> {
        self.interceptor.execute(request).await
    }

    pub fn interceptor(&self) -> &WriteInterceptor {
        &self.interceptor
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    pub fn coordinator(&self) -> &Arc<ConnectivityCoordinator> {
        &self.coordinator
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn queue(&self) -> &Arc<dyn DurableQueue> {
        &self.queue
    }

    /// Mutations that were given up on, oldest drop first.
    pub async fn dropped_mutations(&self) -> CarequeueResult<Vec<DroppedMutation>> {
        self.queue.list_dropped().await
    }

    /// Start the coordinator loop; it stops when the sender side is dropped.
    pub fn spawn_coordinator(&self) -> (mpsc::Sender<ConnectivitySignal>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(16);
        (tx, self.coordinator.spawn(rx))
    }
}
