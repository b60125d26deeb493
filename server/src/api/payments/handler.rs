//! Payment API handlers

use axum::Json;
use axum::extract::{Path, State};

use shared::order::{CardIntentResponse, ConfirmCardRequest, ConfirmCashRequest};

use crate::core::ServerState;
use crate::db::models::Order;
use crate::utils::{AppResponse, AppResult, ok};

/// Customer asks to pay cash at the table
pub async fn request_cash(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.payments.request_cash_payment(&order_id).await?;
    Ok(ok(order))
}

/// Waiter confirms the collected cash
pub async fn confirm_cash(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<ConfirmCashRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .payments
        .confirm_cash_payment(&order_id, payload)
        .await?;
    Ok(ok(order))
}

/// Open a card intent sized to the order total
pub async fn create_card_intent(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<CardIntentResponse>>> {
    let response = state.payments.create_card_intent(&order_id).await?;
    Ok(ok(response))
}

/// Settle a card payment once the provider reports capture
pub async fn confirm_card(
    State(state): State<ServerState>,
    Json(payload): Json<ConfirmCardRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .payments
        .confirm_card_payment(&payload.intent_id)
        .await?;
    Ok(ok(order))
}
