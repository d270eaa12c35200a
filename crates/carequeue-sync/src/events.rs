//! Typed in-process notifications: "queue changed" and "sync complete".

use tokio::sync::broadcast;

use carequeue_core::models::SyncSummary;

/// Events carried on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEvent {
    /// The pending count may have changed.
    QueueChanged,
    /// A synchronization pass finished.
    SyncComplete(SyncSummary),
}

const DEFAULT_CAPACITY: usize = 64;

/// Fire-and-forget, multi-listener event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    /// Publish to every current listener. Returns how many received it;
    /// zero listeners is not an error.
    pub fn publish(&self, event: QueueEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
