//! Order lifecycle engine
//!
//! ```text
//! orders/
//! ├── engine.rs    create/merge, accept/reject, status pipeline
//! ├── money.rs     totals invariant
//! ├── locks.rs     per-table write leases
//! └── error.rs     domain error taxonomy
//! ```

pub mod engine;
pub mod error;
pub mod locks;
pub mod money;

#[cfg(test)]
pub(crate) mod tests;

pub use engine::{OrderEngine, RejectOutcome};
pub use error::{OrderError, OrderResult};
pub use locks::TableLocks;
