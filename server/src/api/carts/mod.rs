//! Cart API
//!
//! The pre-order basket boundary. Prices are snapshotted server-side on
//! every add; clients never supply amounts.

mod handler;

use axum::Router;
use axum::routing::{delete, get, post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/carts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart))
        .route("/items", post(handler::add_item))
        .route("/table/{table_id}", delete(handler::clear_for_table))
}
