//! Request bodies sent to the analytics endpoint.

use crate::device::{DeviceMetrics, DeviceProbe};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Webhook type for daily retention reports.
pub const RETENTION_EVENT: &str = "retention";
/// Webhook type for custom purchase events.
pub const PURCHASE_EVENT: &str = "custom.purchase";
/// Webhook type for custom ad events.
pub const AD_EVENT: &str = "custom.ad";

/// Body of a token issuance request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// When the payload was built (RFC3339)
    pub timestamp: String,
    pub user_agent: String,
    /// IANA timezone name
    pub timezone: String,
    pub device_name: String,
    pub device_model: String,
    pub os_system: String,
    pub language: String,
    pub sdk_version: String,
}

/// Build the token issuance body from environment signals.
///
/// Probes are best-effort, so this never fails.
pub fn build_token_payload(probe: &dyn DeviceProbe, now: DateTime<Utc>) -> TokenPayload {
    let DeviceMetrics {
        device_name,
        device_model,
        os_version,
    } = probe.device_metrics();

    TokenPayload {
        timestamp: rfc3339(now),
        user_agent: user_agent(),
        timezone: probe.timezone(),
        device_name,
        device_model,
        os_system: os_version,
        language: probe.language(),
        sdk_version: crate::VERSION.to_string(),
    }
}

/// Token issuance response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Envelope wrapping every webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    /// When the event was created (RFC3339)
    pub created_at: String,
    #[serde(rename = "creativeToken")]
    pub creative_token: Option<String>,
    pub device_name: String,
    pub device_model: String,
    pub os_system: String,
    pub utc_offset: String,
    pub retention_day: Option<String>,
    pub payload: serde_json::Value,
}

/// Custom purchase event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub item_id: String,
    pub item_name: String,
    pub value: f64,
    pub currency: String,
    pub status: String,
}

/// Custom ad event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdEvent {
    pub ad_id: String,
    pub name: String,
    pub source: String,
    /// Time the ad was watched, in seconds
    pub watch_time: f64,
    pub reward: String,
    pub media_source: String,
    pub channel: String,
    pub value: f64,
    pub currency: String,
}

/// SDK user agent string.
pub fn user_agent() -> String {
    format!(
        "geeklab-sdk-rust/{} ({}; {})",
        crate::VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Format a timestamp the way the endpoint expects.
pub fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
