//! Order domain wire types
//!
//! - **status**: the order/item/payment/table state machines
//! - **types**: request and response DTOs for the order and payment APIs
//! - **notify**: notification topics and payload envelope

pub mod notify;
pub mod status;
pub mod types;

// Re-exports
pub use notify::{Notification, Topic, event};
pub use status::{ItemStatus, OrderStatus, PaymentMethod, PaymentStatus, TableStatus};
pub use types::*;
