//! Order engine error taxonomy
//!
//! Domain errors carry enough context for the HTTP layer to pick the right
//! status code; repository errors pass through untouched.

use thiserror::Error;

use crate::db::repository::RepoError;
use shared::order::OrderStatus;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    NotFound(String),

    #[error("Order cannot move from {from:?} to {to:?}")]
    InvalidState { from: OrderStatus, to: OrderStatus },

    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    Validation(String),

    #[error("Payment provider: {0}")]
    PaymentProvider(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type OrderResult<T> = Result<T, OrderError>;
