//! Payment API
//!
//! Cash request/confirm and card intent/confirm. Settlement logic lives in
//! the payment service; handlers only translate HTTP.

mod handler;

use axum::Router;
use axum::routing::post;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{order_id}/cash/request", post(handler::request_cash))
        .route("/{order_id}/cash/confirm", post(handler::confirm_cash))
        .route("/{order_id}/card/intent", post(handler::create_card_intent))
        .route("/card/confirm", post(handler::confirm_card))
}
