//! Notification fan-out
//!
//! The engine publishes [`Notification`]s onto an in-process broadcast bus
//! and never waits for delivery; the socket gateway forwards them into the
//! matching room. A publish with no subscribers is normal (e.g. during
//! tests or before any client connects) and only logged at debug level.

pub mod gateway;

use serde_json::Value;
use tokio::sync::broadcast;

use shared::order::{Notification, Topic};

pub use gateway::SocketGateway;

/// Bus capacity: enough for bursts across a full dining room
const CHANNEL_CAPACITY: usize = 4096;

/// Fire-and-forget notification bus
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish to a topic. Never fails, never blocks.
    pub fn publish(&self, topic: &Topic, event: &str, data: Value) {
        let notification = Notification::new(topic, event, data);
        if self.tx.send(notification).is_err() {
            tracing::debug!(topic = %topic, event, "Notification dropped: no subscribers");
        }
    }

    /// Subscribe to the bus (gateway, tests)
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
