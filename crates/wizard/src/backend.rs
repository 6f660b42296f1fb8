//! The interaction backend: an opaque HTTP service that judges a payload.

use {
    async_trait::async_trait,
    reqwest::{StatusCode, header::CONTENT_TYPE},
    serde_json::Value,
    tracing::debug,
    url::Url,
};

use crate::payload::OutboundPayload;

/// Why a check did not produce a response.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// The request never completed (connection refused, DNS, reset, ...).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The body was not JSON.
    #[error("invalid JSON response: {0}")]
    Parse(#[source] serde_json::Error),
}

impl BackendError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(code) => StatusCode::from_u16(*code).ok(),
            Self::Transport(e) => e.status(),
            Self::Parse(_) => None,
        }
    }
}

/// Sends one payload and returns the backend's JSON verbatim.
#[async_trait]
pub trait InteractionBackend: Send + Sync {
    async fn check(&self, payload: &OutboundPayload) -> Result<Value, BackendError>;
}

/// POSTs payloads as JSON to a fixed endpoint.
///
/// No timeout is set beyond the client's defaults.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpBackend {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl InteractionBackend for HttpBackend {
    async fn check(&self, payload: &OutboundPayload) -> Result<Value, BackendError> {
        debug!(endpoint = %self.endpoint, choice = payload.choice(), "posting check");

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await.map_err(BackendError::Transport)?;
        serde_json::from_slice(&bytes).map_err(BackendError::Parse)
    }
}
