//! Error types for the goal store
//!
//! Mirrors the three failure kinds a user can see:
//! - validation failures, raised before any request is made
//! - transport failures, where the request never completed
//! - malformed responses, where a read completed but the body is unusable

use goalboard_model::ValidationError;

/// Low-level transport failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Endpoint URL does not parse
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),

    /// HTTP client could not be constructed
    #[error("http client error: {0}")]
    Client(String),

    /// Request failed before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// Read request answered with a non-success status
    #[error("http {0}")]
    Status(u16),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TransportError::Status(status.as_u16()),
            None => TransportError::Network(err.to_string()),
        }
    }
}

/// Goal store error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Form failed validation; nothing was sent
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Request did not complete
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// Read completed but the body is not a JSON array of records
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl StoreError {
    /// Check if the error was raised locally, before any request
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the request itself failed
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the response body was unusable
    #[inline]
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}
