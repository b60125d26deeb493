//! Notification topics and payload envelope
//!
//! The engine publishes fire-and-forget notifications onto an in-process
//! bus; a socket gateway forwards them into the matching room. Delivery is
//! best-effort by design: order/payment correctness never depends on it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Fan-out destination. Maps one-to-one onto a socket room name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// All waiter/kitchen staff of a restaurant
    Staff { restaurant: String },
    /// The customer-facing channel for one table
    Table { table: String },
    /// Observers of a single order
    Order { order: String },
}

impl Topic {
    pub fn room(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Staff { restaurant } => write!(f, "restaurant:{restaurant}:staff"),
            Topic::Table { table } => write!(f, "table:{table}"),
            Topic::Order { order } => write!(f, "order:{order}"),
        }
    }
}

/// One published notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Room name the gateway should emit into
    pub topic: String,
    /// Event name (e.g. "order:update", "payment:confirmed")
    pub event: String,
    /// Event payload
    pub data: Value,
}

impl Notification {
    pub fn new(topic: &Topic, event: impl Into<String>, data: Value) -> Self {
        Self {
            topic: topic.room(),
            event: event.into(),
            data,
        }
    }
}

/// Event names used by the order engine and payment reconciliation
pub mod event {
    pub const ORDER_UPDATE: &str = "order:update";
    pub const ORDER_REJECTED: &str = "order:rejected";
    pub const ORDER_PARTIALLY_REJECTED: &str = "order:partially_rejected";
    pub const CASH_REQUESTED: &str = "payment:cash_requested";
    pub const PAYMENT_CONFIRMED: &str = "payment:confirmed";
    pub const TABLE_PAYMENT_COMPLETED: &str = "table:payment_completed";
}
