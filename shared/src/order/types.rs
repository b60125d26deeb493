//! Request and response DTOs for the order and payment APIs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::OrderStatus;

/// One requested modifier option within a group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierOptionInput {
    pub name: String,
}

/// One modifier group selection on an order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierSelectionInput {
    /// Modifier group name as shown on the menu (e.g. "Extras")
    pub name: String,
    /// Chosen options within the group
    #[serde(default)]
    pub options: Vec<ModifierOptionInput>,
}

/// One requested order line. Prices are never taken from the client;
/// the server snapshots them from the menu catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    /// Menu item id ("menu_item:xyz")
    pub menu_item: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default)]
    pub modifiers: Vec<ModifierSelectionInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Create (or merge into) an order for a table
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub restaurant: String,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[validate(length(min = 1, message = "at least one item is required"))]
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
}

/// Accept a pending order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptOrderRequest {
    pub waiter: String,
}

/// Reject the pending items of an order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectOrderRequest {
    pub waiter: String,
    #[validate(length(min = 1, message = "a rejection reason is required"))]
    pub reason: String,
}

/// Progress an order to a new status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Waiter confirmation of a cash payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmCashRequest {
    pub amount_received: Decimal,
    #[serde(default)]
    pub tip_amount: Decimal,
}

/// Card intent creation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardIntentResponse {
    pub client_secret: String,
}

/// Card confirmation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmCardRequest {
    pub intent_id: String,
}

/// Add an item to a cart. Exactly one of `session_id`/`customer` must be
/// present; the store enforces this at write time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCartItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub menu_item: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default)]
    pub modifiers: Vec<ModifierSelectionInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Query key for cart lookups
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CartQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantity_fails_validation() {
        let input = OrderItemInput {
            menu_item: "menu_item:salmon".to_string(),
            quantity: 0,
            modifiers: vec![],
            special_instructions: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn empty_item_list_fails_validation() {
        let req = CreateOrderRequest {
            restaurant: "restaurant:main".to_string(),
            table: "dining_table:t1".to_string(),
            customer: None,
            guest_name: None,
            items: vec![],
        };
        assert!(req.validate().is_err());
    }
}
