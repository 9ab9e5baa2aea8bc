//! Transport seam between the goal client and the remote store
//!
//! The store speaks two verbs: read everything, and submit a JSON body.
//! Submits are fire-and-forget; the response is never read, so success
//! only means the request went out without a transport-level failure.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::sync::Arc;

/// Remote store transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the raw body of a full read
    async fn read(&self) -> Result<String, TransportError>;

    /// Post a JSON body without reading the response
    async fn submit(&self, body: Value) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn read(&self) -> Result<String, TransportError> {
        (**self).read().await
    }

    async fn submit(&self, body: Value) -> Result<(), TransportError> {
        (**self).submit(body).await
    }
}

/// HTTP transport for a single store endpoint
///
/// `GET {url}` reads, `POST {url}` with a JSON body writes. No client-side
/// timeout is set; requests run until they complete or fail.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for `endpoint`
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidEndpoint`] if the URL does not parse,
    /// or [`TransportError::Client`] if the HTTP client cannot be built
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| TransportError::InvalidEndpoint(e.to_string()))?;
        let http = Client::builder()
            .user_agent(concat!("goalboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { http, endpoint })
    }

    /// Endpoint this transport talks to
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn read(&self) -> Result<String, TransportError> {
        let response = self.http.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    async fn submit(&self, body: Value) -> Result<(), TransportError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        // opaque by contract: status is logged, never interpreted
        tracing::debug!(status = response.status().as_u16(), "submit delivered");
        Ok(())
    }
}
