//! Core server infrastructure
//!
//! - **config**: environment-driven configuration
//! - **state**: shared service handles
//! - **server**: HTTP server startup and shutdown
//! - **tasks**: background task registry

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
