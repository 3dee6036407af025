//! Client for the external background-check function.
//!
//! The function is invoked with `POST {url}`, a bearer token and a JSON body
//! describing the contractor. It answers `{success, candidate_id?, message?}`.
//! Handlers talk to it through [`BackgroundCheckProvider`] so tests can swap
//! in a fake.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use fait_core::types::DbId;

use crate::config::BackgroundCheckConfig;

/// HTTP request timeout for a single initiation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct BackgroundCheckRequest {
    pub contractor_id: DbId,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundCheckResponse {
    pub success: bool,
    pub candidate_id: Option<String>,
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum BackgroundCheckError {
    /// No URL/token configured for this deployment.
    #[error("Background checks are not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Background check request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The function answered with a non-2xx status.
    #[error("Background check service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The function answered `success: false`.
    #[error("Background check was not started: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[async_trait]
pub trait BackgroundCheckProvider: Send + Sync {
    /// Start a check and return the provider's candidate id, if any.
    async fn initiate(
        &self,
        request: &BackgroundCheckRequest,
    ) -> Result<BackgroundCheckResponse, BackgroundCheckError>;
}

/// [`BackgroundCheckProvider`] backed by the configured HTTP function.
pub struct HttpBackgroundCheck {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HttpBackgroundCheck {
    pub fn new(config: &BackgroundCheckConfig) -> Result<Self, BackgroundCheckError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl BackgroundCheckProvider for HttpBackgroundCheck {
    async fn initiate(
        &self,
        request: &BackgroundCheckRequest,
    ) -> Result<BackgroundCheckResponse, BackgroundCheckError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackgroundCheckError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BackgroundCheckResponse = response.json().await?;
        if !parsed.success {
            return Err(BackgroundCheckError::Rejected(
                parsed
                    .message
                    .unwrap_or_else(|| "no reason given".to_string()),
            ));
        }
        Ok(parsed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
