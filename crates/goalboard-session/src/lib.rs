//! Goalboard Session
//!
//! Session state for the goal board, kept apart from any UI toolkit.
//!
//! # Overview
//!
//! - **Session**: goal list, forms, edit dialog, and request phase as a value
//! - **Transitions**: `Session::apply(Event) -> Vec<Effect>`, no I/O
//! - **SessionDriver**: runs effects through a `GoalClient` and feeds the
//!   completions back
//! - **Visitor**: persistent anonymous visitor id
//!
//! # Example
//!
//! ```rust,no_run
//! use goalboard_session::{Event, SessionDriver};
//! use goalboard_store::{GoalClient, HttpTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GoalClient::new(HttpTransport::new("https://example.com/exec")?);
//! let mut driver = SessionDriver::new(client);
//! let session = driver.handle(Event::Load).await;
//! println!("{} goals", session.goals().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod state;
pub mod state_machine;
pub mod visitor;

// Re-exports
pub use driver::SessionDriver;
pub use error::{SessionError, VisitorError};
pub use state::{Dialog, Effect, Event, Notice, Phase, Session};
pub use state_machine::{allowed_transitions, validate_transition};
pub use visitor::{VisitorId, VisitorStore, VISITOR_KEY, VISITOR_MAX_AGE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
