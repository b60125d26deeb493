//! Shared types for the dine-in ordering platform
//!
//! Wire-level types used by both the server and its kitchen/waiter/customer
//! clients: status enums, request/response DTOs and notification payloads.

pub mod order;

pub use serde::{Deserialize, Serialize};
