//! Dine-in ordering server
//!
//! Backend for a QR-code dine-in ordering platform: customers scan a table
//! code, build a cart and submit an order; waiters and kitchen staff move
//! the order through its status pipeline; payment settles the tab and frees
//! the table.
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # Config, state, HTTP server, background tasks
//! ├── utils/         # Error responses, logging
//! ├── db/            # Embedded SurrealDB, models, repositories
//! ├── orders/        # Order engine: create/merge, accept/reject, status
//! ├── payments/      # Cash and card reconciliation
//! ├── notify/        # Broadcast bus + socket room gateway
//! └── api/           # HTTP routes and handlers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod payments;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use notify::Notifier;
pub use orders::{OrderEngine, OrderError};
pub use payments::PaymentService;
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};
