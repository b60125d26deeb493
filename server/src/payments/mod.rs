//! Payment reconciliation
//!
//! ```text
//! payments/
//! ├── service.rs    cash two-phase flow, card intent/confirm, settlement
//! └── provider.rs   card provider trait + HTTP client
//! ```

pub mod provider;
pub mod service;

#[cfg(test)]
mod tests;

pub use provider::{CardProvider, HttpCardProvider, IntentStatus, PaymentIntent};
pub use service::PaymentService;
