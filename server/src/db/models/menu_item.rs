//! Menu item model
//!
//! Read-only from the engine's perspective apart from the lifetime
//! popularity counter. Prices and modifier adjustments are snapshotted into
//! order/cart lines at selection time and never dereferenced live again.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Availability of a menu item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuItemStatus {
    #[default]
    Available,
    Unavailable,
}

/// One option within a modifier group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuModifierOption {
    pub name: String,
    #[serde(default)]
    pub price_adjustment: Decimal,
}

/// A modifier group offered by a menu item (e.g. "Extras", "Dressing")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuModifierGroup {
    pub name: String,
    #[serde(default)]
    pub options: Vec<MenuModifierOption>,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub status: MenuItemStatus,
    #[serde(default)]
    pub modifiers: Vec<MenuModifierGroup>,
    /// Lifetime ordered-quantity counter, bumped best-effort on completion
    #[serde(default)]
    pub total_orders: i64,
}
