//! Seams between the queue, the network, and the sync logic.

pub mod durable_queue;
pub mod transport;

pub use durable_queue::DurableQueue;
pub use transport::Transport;
