//! Goalboard CLI
//!
//! Library side of the `goalboard` binary: configuration, the command tree,
//! and terminal rendering.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod render;

pub use app::{command, needs_store, run_local, run_remote};
pub use config::{ConfigError, GoalboardConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
