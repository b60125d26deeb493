//! Cart model
//!
//! Transient pre-order basket. Keyed by at least one of session/customer;
//! items follow the same subtotal rule as order lines but carry a local
//! instance id instead of a kitchen status. Idle carts expire after two
//! hours via the background sweep.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::order::ModifierSelection;
use super::serde_helpers;

/// One line in a cart, snapshot-priced like an order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Local identifier for in-cart edits
    pub instance_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub modifiers: Vec<ModifierSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub subtotal: Decimal,
}

impl CartItem {
    /// Recompute this line's subtotal from its snapshots
    pub fn recompute_subtotal(&mut self) {
        let adjustments: Decimal = self.modifiers.iter().map(|m| m.adjustment_total()).sum();
        self.subtotal = (self.price + adjustments) * Decimal::from(self.quantity);
    }
}

/// Cart document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub customer: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table: Option<RecordId>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Drives the 2-hour inactivity expiry
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(
        session_id: Option<String>,
        customer: Option<RecordId>,
        table: Option<RecordId>,
    ) -> Self {
        Self {
            id: None,
            session_id,
            customer,
            table,
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// A cart must be addressable by session or customer
    pub fn has_owner(&self) -> bool {
        self.session_id.is_some() || self.customer.is_some()
    }

    /// Sum of all line subtotals
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|i| i.subtotal).sum()
    }
}
