//! Connectivity coordinator: owns the process-wide `ConnectivityState` and
//! decides when a synchronization pass runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use carequeue_core::config::SyncConfig;
use carequeue_core::errors::{CarequeueError, CarequeueResult, SyncError};
use carequeue_core::models::{ConnectivityState, SyncSummary};
use carequeue_core::traits::DurableQueue;

use crate::engine::SyncEngine;
use crate::events::{EventBus, QueueEvent};

/// External inputs that drive the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivitySignal {
    /// The platform reported the network as reachable.
    Online,
    /// The platform reported the network as lost.
    Offline,
    /// Someone asked for a pass, e.g. a background coordination channel.
    SyncRequested,
}

/// Clears the syncing flag when `trigger_sync` returns, including on error.
struct SyncingGuard<'a>(&'a AtomicBool);

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ConnectivityCoordinator {
    engine: Arc<SyncEngine>,
    queue: Arc<dyn DurableQueue>,
    events: EventBus,
    config: SyncConfig,
    state: watch::Sender<ConnectivityState>,
    syncing: AtomicBool,
}

impl ConnectivityCoordinator {
    /// Build the coordinator with a pending count read fresh from the store.
    pub async fn start(
        engine: Arc<SyncEngine>,
        queue: Arc<dyn DurableQueue>,
        events: EventBus,
        config: SyncConfig,
        initially_online: bool,
    ) -> CarequeueResult<Arc<Self>> {
        let pending = queue.count().await?;
        let (state, _) = watch::channel(ConnectivityState::new(initially_online, pending));

        tracing::info!(online = initially_online, pending, "connectivity coordinator started");

        Ok(Arc::new(Self {
            engine,
            queue,
            events,
            config,
            state,
            syncing: AtomicBool::new(false),
        }))
    }

    pub fn state(&self) -> ConnectivityState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.state.subscribe()
    }

    pub fn is_online(&self) -> bool {
        self.state.borrow().is_online
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending_count
    }

    pub fn is_syncing(&self) -> bool {
        self.state.borrow().is_syncing
    }

    pub fn last_sync_result(&self) -> Option<SyncSummary> {
        self.state.borrow().last_sync_result
    }

    /// Record a connectivity change. Going from offline to online runs a
    /// pass when `sync_on_reconnect` is enabled; its summary is returned.
    pub async fn set_online(&self, online: bool) -> CarequeueResult<Option<SyncSummary>> {
        let mut was_online = online;
        self.state.send_modify(|state| {
            was_online = state.is_online;
            state.is_online = online;
        });

        if was_online == online {
            return Ok(None);
        }
        tracing::info!(online, "connectivity changed");

        if online && self.config.sync_on_reconnect {
            return self.trigger_sync().await;
        }
        Ok(None)
    }

    /// Run a pass now.
    ///
    /// Returns `None` without touching the network when offline or when a
    /// pass is already in flight. The in-flight check and the flag update
    /// are a single atomic operation.
    pub async fn trigger_sync(&self) -> CarequeueResult<Option<SyncSummary>> {
        if !self.is_online() {
            tracing::debug!("sync requested while offline; ignored");
            return Ok(None);
        }
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("sync already in progress; request dropped");
            return Ok(None);
        }
        let _guard = SyncingGuard(&self.syncing);

        self.state.send_modify(|state| state.is_syncing = true);

        let outcome = self.engine.run_sync().await;
        let pending = self.queue.count().await;

        self.state.send_modify(|state| {
            state.is_syncing = false;
            if let Ok(count) = &pending {
                state.pending_count = *count;
            }
            if let Ok(summary) = &outcome {
                state.last_sync_result = Some(*summary);
            }
        });

        let summary = match outcome {
            Ok(summary) => Some(summary),
            // A pass started directly on the engine is still running.
            Err(CarequeueError::Sync(SyncError::AlreadyRunning)) => None,
            Err(e) => return Err(e),
        };
        pending?;
        Ok(summary)
    }

    /// Re-read the pending count from the store and publish it.
    pub async fn refresh_pending(&self) -> CarequeueResult<usize> {
        let count = self.queue.count().await?;
        self.state.send_modify(|state| state.pending_count = count);
        Ok(count)
    }

    /// Drive the coordinator until the signal channel closes.
    ///
    /// Reacts to connectivity signals, to `QueueChanged` events on the bus,
    /// and to the periodic timer when `sync_interval_secs` is non-zero.
    /// Errors are logged; the loop keeps running.
    pub async fn run(&self, signals: mpsc::Receiver<ConnectivitySignal>) {
        self.drive(signals, self.events.subscribe()).await
    }

    /// Run `run` on the tokio runtime. Bus events published after this
    /// returns are seen by the loop.
    pub fn spawn(self: &Arc<Self>, signals: mpsc::Receiver<ConnectivitySignal>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        let bus = self.events.subscribe();
        tokio::spawn(async move { this.drive(signals, bus).await })
    }

    async fn drive(
        &self,
        mut signals: mpsc::Receiver<ConnectivitySignal>,
        mut bus: broadcast::Receiver<QueueEvent>,
    ) {
        let mut ticker = self.periodic_ticker();

        loop {
            tokio::select! {
                signal = signals.recv() => {
                    let Some(signal) = signal else { break };
                    self.handle_signal(signal).await;
                }
                event = bus.recv() => match event {
                    Ok(QueueEvent::QueueChanged) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        if let Err(e) = self.refresh_pending().await {
                            tracing::error!("pending count refresh failed: {e}");
                        }
                    }
                    Ok(QueueEvent::SyncComplete(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => {
                        bus = self.events.subscribe();
                    }
                },
                _ = next_tick(&mut ticker) => {
                    self.log_sync_outcome(self.trigger_sync().await);
                }
            }
        }

        tracing::debug!("connectivity signal channel closed; coordinator stopped");
    }

    async fn handle_signal(&self, signal: ConnectivitySignal) {
        match signal {
            ConnectivitySignal::Online => self.log_sync_outcome(self.set_online(true).await),
            ConnectivitySignal::Offline => self.log_sync_outcome(self.set_online(false).await),
            ConnectivitySignal::SyncRequested => self.log_sync_outcome(self.trigger_sync().await),
        }
    }

    fn log_sync_outcome(&self, outcome: CarequeueResult<Option<SyncSummary>>) {
        match outcome {
            Ok(Some(summary)) if !summary.is_clean() => {
                tracing::warn!(
                    failed = summary.failed,
                    dropped = summary.dropped,
                    retained = summary.retained(),
                    "sync pass left failures"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::error!("sync pass aborted: {e}"),
        }
    }

    fn periodic_ticker(&self) -> Option<Interval> {
        if self.config.sync_interval_secs == 0 {
            return None;
        }
        let period = Duration::from_secs(self.config.sync_interval_secs);
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Some(interval)
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
