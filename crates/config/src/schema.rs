//! Config schema types.

use {
    serde::{Deserialize, Serialize},
    url::Url,
};

use crate::error::{Error, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedcheckConfig {
    pub backend: BackendConfig,
}

/// Where checks are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Interaction endpoint that receives the JSON payload.
    pub url: Option<String>,
}

impl MedcheckConfig {
    /// The validated backend endpoint.
    pub fn endpoint(&self) -> Result<Url> {
        match self.backend.url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_endpoint(raw),
            _ => Err(Error::MissingUrl),
        }
    }
}

/// Parse an absolute `http`/`https` endpoint URL.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let invalid = |reason: String| Error::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {},
        other => return Err(invalid(format!("unsupported scheme {other:?}"))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".into()));
    }
    Ok(url)
}
