//! Goalboard Store
//!
//! Client side of the spreadsheet-backed goal store.
//!
//! # Overview
//!
//! - **Transport**: read-all / submit-body seam, with an HTTP implementation
//! - **Mutation**: validated create/update/delete and its JSON body
//! - **GoalClient**: validation, dispatch, and lenient decoding of reads
//!
//! Writes are fire-and-forget. Callers reconcile by reading again after
//! every write; the client never infers store state from a submit.
//!
//! # Example
//!
//! ```rust,no_run
//! use goalboard_store::{GoalClient, HttpTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GoalClient::new(HttpTransport::new("https://example.com/exec")?);
//! for goal in client.fetch_all().await? {
//!     println!("{}: {}%", goal.description, goal.progress());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod transport;
pub mod wire;

// Re-exports
pub use client::GoalClient;
pub use error::{StoreError, TransportError};
pub use transport::{HttpTransport, Transport};
pub use wire::{decode_records, Decoded, Mutation, MutationKind, RecordRejection};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
