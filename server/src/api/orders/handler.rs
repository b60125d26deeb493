//! Order API handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use shared::order::{
    AcceptOrderRequest, CreateOrderRequest, RejectOrderRequest, UpdateStatusRequest,
};

use crate::core::ServerState;
use crate::db::models::Order;
use crate::orders::RejectOutcome;
use crate::utils::{AppResponse, AppResult, ok};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create an order, or merge into the table's open one
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.engine.create_order(payload).await?;
    Ok(ok(order))
}

/// List orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.engine.list_orders(query.limit, query.offset).await?;
    Ok(ok(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.engine.get_order(&id).await?;
    Ok(ok(order))
}

/// The unsettled order attached to a table
pub async fn active_for_table(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.engine.active_order_for_table(&table_id).await?;
    Ok(ok(order))
}

/// Waiter accepts a pending order
pub async fn accept(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AcceptOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.engine.accept_order(&id, payload).await?;
    Ok(ok(order))
}

/// Waiter rejects the pending items of an order
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RejectOrderRequest>,
) -> AppResult<Json<AppResponse<RejectOutcome>>> {
    let outcome = state.engine.reject_order(&id, payload).await?;
    Ok(ok(outcome))
}

/// Progress an order along the status pipeline
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.engine.update_status(&id, payload.status).await?;
    Ok(ok(order))
}

/// Admin removal of an order
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.engine.delete_order(&id).await?;
    Ok(ok(()))
}
