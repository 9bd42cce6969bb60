//! HTTP transport bound to one API key and one analytics endpoint.

use crate::config::SdkConfig;
use crate::core::payload::user_agent;
use crate::error::SdkError;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "geeklab-api-key";

/// Token issuance endpoint path.
pub const FETCH_TOKEN_PATH: &str = "/fetch-token";
/// Event ingestion endpoint path.
pub const WEBHOOK_PATH: &str = "/webhook";

/// A validated, non-empty API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate a caller-supplied key.
    pub fn new(key: impl Into<String>) -> Result<Self, SdkError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(SdkError::InvalidArgument(
                "API key must not be empty".to_string(),
            ));
        }
        if HeaderValue::from_str(&key).is_err() {
            return Err(SdkError::InvalidArgument(
                "API key contains invalid characters".to_string(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// HTTP client for the analytics endpoint.
#[derive(Debug, Clone)]
pub struct TransportClient {
    config: SdkConfig,
    client: reqwest::Client,
}

impl TransportClient {
    /// Create a client that sends `api_key` with every request.
    pub fn new(config: SdkConfig, api_key: &ApiKey) -> Result<Self, SdkError> {
        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key.as_str()).map_err(|_| {
            SdkError::InvalidArgument("API key contains invalid characters".to_string())
        })?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .default_headers(headers)
            .build()
            .map_err(|e| SdkError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// POST a JSON body and return the response body.
    ///
    /// Non-JSON success bodies come back as a JSON string, empty ones as
    /// `null`. Failures are classified into [`SdkError`].
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value, SdkError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "Sending request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "No response from analytics endpoint");
                SdkError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Analytics endpoint returned an error");
            // A response arrived, so classify by status even if its body is unreadable
            let message = response.text().await.unwrap_or_default();
            return Err(SdkError::from_status(status.as_u16(), message));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }
}
