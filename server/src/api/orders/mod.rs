//! Order API
//!
//! Creation and merge, approval, status progression and admin removal.
//! All mutations go through the order engine.

mod handler;

use axum::Router;
use axum::routing::{get, patch, post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/status", patch(handler::update_status))
        .route("/table/{table_id}/active", get(handler::active_for_table))
}
