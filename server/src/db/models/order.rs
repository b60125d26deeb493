//! Order aggregate model
//!
//! One dine-in tab. May absorb several submission rounds for the same table
//! (see the engine's merge path); items keep their insertion order and are
//! never removed during the normal flow; a rejected item stays in the list
//! for receipts with its value excluded from the totals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::order::{ItemStatus, OrderStatus, PaymentMethod, PaymentStatus};

use super::serde_helpers;

/// One chosen option within a modifier group, price snapshotted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierOption {
    pub name: String,
    #[serde(default)]
    pub price_adjustment: Decimal,
}

/// One modifier group selection on an order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierSelection {
    pub name: String,
    #[serde(default)]
    pub options: Vec<ModifierOption>,
}

impl ModifierSelection {
    /// Sum of the price adjustments of every chosen option
    pub fn adjustment_total(&self) -> Decimal {
        self.options.iter().map(|o| o.price_adjustment).sum()
    }
}

/// One line within an order, snapshot-priced at insertion time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    /// Name snapshot, immutable once written
    pub name: String,
    /// Base price snapshot, immutable once written
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub modifiers: Vec<ModifierSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// `(price + Σ adjustments) * quantity`, recomputed on every change
    pub subtotal: Decimal,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl OrderItem {
    /// Recompute this line's subtotal from its snapshots
    pub fn recompute_subtotal(&mut self) {
        let adjustments: Decimal = self.modifiers.iter().map(|m| m.adjustment_total()).sum();
        self.subtotal = (self.price + adjustments) * Decimal::from(self.quantity);
    }
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Sequential, zero-padded, assigned once at creation
    pub order_number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    /// Every order is dine-in: the table reference is required and fixed
    /// for the order's lifetime
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub customer: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    /// Insertion order = submission order, never reordered
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    // === Money ===
    pub subtotal: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub tip_amount: Decimal,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_received: Option<Decimal>,

    #[serde(default, with = "serde_helpers::option_record_id")]
    pub waiter: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Bumped on every persisted mutation
    #[serde(default)]
    pub revision: u64,

    // === Lifecycle timestamps, each set exactly once ===
    pub ordered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparing_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Open a new pending tab for a table
    pub fn new(
        order_number: String,
        restaurant: RecordId,
        table: RecordId,
        customer: Option<RecordId>,
        guest_name: Option<String>,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            id: None,
            order_number,
            restaurant,
            table,
            customer,
            guest_name,
            items,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            payment_intent_id: None,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            tip_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            amount_received: None,
            waiter: None,
            rejection_reason: None,
            revision: 0,
            ordered_at: Utc::now(),
            accepted_at: None,
            preparing_at: None,
            ready_at: None,
            served_at: None,
            completed_at: None,
            rejected_at: None,
            paid_at: None,
        }
    }

    /// Stamp the lifecycle timestamp matching `status`, first transition only
    pub fn stamp(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        let slot = match status {
            OrderStatus::Accepted => &mut self.accepted_at,
            OrderStatus::Preparing => &mut self.preparing_at,
            OrderStatus::Ready => &mut self.ready_at,
            OrderStatus::Served => &mut self.served_at,
            OrderStatus::Completed => &mut self.completed_at,
            OrderStatus::Rejected => &mut self.rejected_at,
            OrderStatus::Pending | OrderStatus::Cancelled => return,
        };
        if slot.is_none() {
            *slot = Some(now);
        }
    }
}
