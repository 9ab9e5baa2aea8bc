//! Error types for the goal session

use crate::state::Phase;
use std::path::PathBuf;

/// Session error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Phase change not permitted
    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current phase
        from: Phase,
        /// Requested phase
        to: Phase,
    },
}

/// Visitor identity errors
#[derive(Debug, thiserror::Error)]
pub enum VisitorError {
    /// Identity file could not be read or written
    #[error("visitor file {path}: {source}")]
    Io {
        /// File location
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
}

impl VisitorError {
    /// Path of the file involved
    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}
