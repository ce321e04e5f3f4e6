// SPDX-License-Identifier: MIT OR Apache-2.0
//! Client for the 4byte.directory public signature database.
//!
//! Strictly an unverified source: anyone can register any signature, so
//! results are carried with `verified = false` and the full candidate list
//! is kept for auditing. Timeouts and transport failures are local,
//! non-fatal events; the pipeline proceeds as if the source returned
//! nothing.

use sentinel_error::ErrorCode;
use sentinel_types::Selector;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.4byte.directory";

/// Default per-lookup timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// External lookup failures. All of them are non-fatal to a decode.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The lookup did not complete within the configured timeout.
    #[error("signature lookup timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure.
    #[error("signature lookup failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("signature lookup returned HTTP {0}")]
    BadStatus(u16),
}

impl LookupError {
    /// Map onto the stable Sentinel error code table.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout(_) => ErrorCode::ExternalLookupTimeout,
            Self::Transport(_) | Self::BadStatus(_) => ErrorCode::ExternalLookupFailure,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SignatureResponse {
    results: Vec<SignatureResult>,
}

#[derive(Debug, Deserialize)]
struct SignatureResult {
    text_signature: String,
}

/// HTTP client for the signature database.
#[derive(Debug, Clone)]
pub struct FourByteClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl FourByteClient {
    /// A client against a custom endpoint (tests point this at a mock).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    /// A client against the public directory with the default timeout.
    pub fn public() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// All candidate signatures for a selector, most popular first.
    pub async fn lookup(&self, selector: &Selector) -> Result<Vec<String>, LookupError> {
        let url = format!(
            "{}/api/v1/signatures/?hex_signature={}",
            self.base_url,
            selector.to_hex()
        );
        debug!(%selector, "external signature lookup");

        let request = self.http.get(&url).send();
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                warn!(%selector, "external signature lookup timed out");
                LookupError::Timeout(self.timeout)
            })?
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::BadStatus(response.status().as_u16()));
        }

        let body: SignatureResponse = tokio::time::timeout(self.timeout, response.json())
            .await
            .map_err(|_| LookupError::Timeout(self.timeout))?
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let matches: Vec<String> = body
            .results
            .into_iter()
            .map(|r| r.text_signature)
            .collect();
        debug!(%selector, candidates = matches.len(), "external lookup complete");
        Ok(matches)
    }
}
