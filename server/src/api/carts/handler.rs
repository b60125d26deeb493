//! Cart API handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use surrealdb::RecordId;
use uuid::Uuid;
use validator::Validate;

use shared::order::{AddCartItemRequest, CartQuery};

use crate::core::ServerState;
use crate::db::models::{Cart, CartItem};
use crate::orders::engine::resolve_modifiers;
use crate::utils::{AppError, AppResponse, AppResult, ok};

fn parse_record(raw: &str, what: &str) -> Result<RecordId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid {} id: {}", what, raw)))
}

/// Add an item to the caller's cart, creating the cart on first use
pub async fn add_item(
    State(state): State<ServerState>,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<Json<AppResponse<Cart>>> {
    payload.validate()?;
    if payload.session_id.is_none() && payload.customer.is_none() {
        return Err(AppError::Validation(
            "A session or customer is required".to_string(),
        ));
    }

    let menu_ref = parse_record(&payload.menu_item, "menu item")?;
    let menu_item = state.menu_items.find_available(&menu_ref).await?;
    let modifiers = resolve_modifiers(&menu_item, &payload.modifiers)?;

    let customer = match &payload.customer {
        Some(raw) => Some(parse_record(raw, "customer")?),
        None => None,
    };
    let table = match &payload.table {
        Some(raw) => Some(parse_record(raw, "table")?),
        None => None,
    };

    let existing = if let Some(session) = &payload.session_id {
        state.carts.find_by_session(session).await?
    } else if let Some(customer_ref) = &customer {
        state.carts.find_by_customer(customer_ref).await?
    } else {
        None
    };

    let mut cart = existing.unwrap_or_else(|| {
        Cart::new(payload.session_id.clone(), customer.clone(), table.clone())
    });
    if cart.table.is_none() {
        cart.table = table;
    }

    let mut item = CartItem {
        instance_id: Uuid::new_v4().to_string(),
        menu_item: menu_ref,
        name: menu_item.name.clone(),
        price: menu_item.price,
        quantity: payload.quantity,
        modifiers,
        special_instructions: payload.special_instructions.clone(),
        subtotal: Decimal::ZERO,
    };
    item.recompute_subtotal();
    cart.items.push(item);

    let saved = if cart.id.is_some() {
        state.carts.save(&cart).await?
    } else {
        state.carts.create(cart).await?
    };
    Ok(ok(saved))
}

/// Look a cart up by table, session or customer (in that order)
pub async fn get_cart(
    State(state): State<ServerState>,
    Query(query): Query<CartQuery>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let cart = if let Some(table) = &query.table {
        let table_ref = parse_record(table, "table")?;
        state.carts.find_by_table(&table_ref).await?
    } else if let Some(session) = &query.session_id {
        state.carts.find_by_session(session).await?
    } else if let Some(customer) = &query.customer {
        let customer_ref = parse_record(customer, "customer")?;
        state.carts.find_by_customer(&customer_ref).await?
    } else {
        return Err(AppError::Validation(
            "session_id, customer or table is required".to_string(),
        ));
    };

    let cart = cart.ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;
    Ok(ok(cart))
}

/// Drop every cart attached to a table
pub async fn clear_for_table(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let table_ref = parse_record(&table_id, "table")?;
    state.carts.delete_by_table(&table_ref).await?;
    Ok(ok(()))
}
