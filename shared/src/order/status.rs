//! Status state machines for orders, items, payments and tables

use serde::{Deserialize, Serialize};

/// Order-level lifecycle status
///
/// The main line is `Pending → Accepted → Preparing → Ready → Served →
/// Completed`. `Rejected` branches off `Pending`; `Cancelled` is an
/// admin-only override from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Preparing,
    Ready,
    Served,
    Completed,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Rejected | OrderStatus::Cancelled
        )
    }

    /// Explicit transition table for status updates.
    ///
    /// Forward skips are allowed once the approval gate has passed
    /// (a small kitchen may not track every prep stage), but `Pending`
    /// can only move through accept/reject, and `Completed` requires
    /// `Served`. `Cancelled` is reachable from any non-terminal state.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        if target == Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, target),
            (Pending, Accepted)
                | (Pending, Rejected)
                | (Accepted, Preparing)
                | (Accepted, Ready)
                | (Accepted, Served)
                | (Preparing, Ready)
                | (Preparing, Served)
                | (Ready, Served)
                | (Served, Completed)
        )
    }
}

/// Per-item kitchen status, independent of the order-level status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Rejected,
}

impl ItemStatus {
    /// Progress rank for the forward-only cascade. `Rejected` is outside
    /// the pipeline and never ranks.
    pub fn rank(&self) -> Option<u8> {
        match self {
            ItemStatus::Pending => Some(0),
            ItemStatus::Preparing => Some(1),
            ItemStatus::Ready => Some(2),
            ItemStatus::Served => Some(3),
            ItemStatus::Rejected => None,
        }
    }

    /// True when the item is still moving through the kitchen pipeline
    /// (not yet served, not rejected)
    pub fn is_in_pipeline(&self) -> bool {
        matches!(
            self,
            ItemStatus::Pending | ItemStatus::Preparing | ItemStatus::Ready
        )
    }
}

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    PendingCash,
    Paid,
    Failed,
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Physical table status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Inactive,
    Occupied,
    Reserved,
}
