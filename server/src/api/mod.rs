//! API routes
//!
//! - [`health`] - liveness probe
//! - [`orders`] - order lifecycle endpoints
//! - [`payments`] - cash and card settlement endpoints
//! - [`carts`] - pre-order cart boundary

pub mod carts;
pub mod health;
pub mod orders;
pub mod payments;

use axum::Router;

use crate::core::ServerState;

/// Build the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(payments::router())
        .merge(carts::router())
        .with_state(state)
}
