//! The SDK façade: creative tokens, retention and custom events.
//!
//! [`GeeklabSdk`] owns the store, the device probe and, once an API key
//! has been set, a [`Session`] pairing the key with its bound transport
//! client. Operations that reach the network fail with
//! [`SdkError::NotInitialized`] until a key is set.
//!
//! Every network operation is a single request: nothing is queued,
//! batched or retried.

use crate::config::SdkConfig;
use crate::core::payload::{
    build_token_payload, rfc3339, AdEvent, PurchaseEvent, TokenResponse, WebhookEnvelope,
    AD_EVENT, PURCHASE_EVENT, RETENTION_EVENT,
};
use crate::core::retention::{local_today, RetentionTracker};
use crate::device::{self, DeviceProbe, SystemProbe};
use crate::error::SdkError;
use crate::store::{FileStore, KeyValueStore, CREATIVE_TOKEN_KEY, RETENTION_DAY_KEY};
use crate::transport::{ApiKey, TransportClient, FETCH_TOKEN_PATH, WEBHOOK_PATH};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of [`GeeklabSdk::initialize`].
#[derive(Debug, Clone, PartialEq)]
pub struct InitializeResult {
    /// The creative token, cached or freshly issued
    pub token: String,
    /// Retention webhook response, `None` if retention was already sent today
    pub metrics: Option<serde_json::Value>,
}

/// API key together with the client bound to it.
#[derive(Debug)]
struct Session {
    api_key: ApiKey,
    transport: TransportClient,
}

/// Geeklab analytics SDK.
pub struct GeeklabSdk {
    config: SdkConfig,
    store: Arc<dyn KeyValueStore>,
    probe: Arc<dyn DeviceProbe>,
    session: Option<Session>,
}

impl GeeklabSdk {
    /// Create an SDK persisting its state in `config.store_path`.
    pub fn new(config: SdkConfig) -> Result<Self, SdkError> {
        config
            .validate()
            .map_err(|e| SdkError::InvalidArgument(e.to_string()))?;
        let store = FileStore::open(&config.store_path)?;
        Ok(Self::with_parts(config, Arc::new(store), Arc::new(SystemProbe::new())))
    }

    /// Create an SDK from the configuration file in the default location.
    pub fn from_default_config() -> Result<Self, SdkError> {
        let config = SdkConfig::load().map_err(|e| SdkError::InvalidArgument(e.to_string()))?;
        Self::new(config)
    }

    /// Create an SDK over a caller-provided store.
    pub fn with_store(config: SdkConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_parts(config, store, Arc::new(SystemProbe::new()))
    }

    /// Create an SDK from explicit collaborators.
    pub fn with_parts(
        config: SdkConfig,
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn DeviceProbe>,
    ) -> Self {
        Self {
            config,
            store,
            probe,
            session: None,
        }
    }

    /// Set the API key and bind a fresh transport client to it.
    pub fn set_api_key(&mut self, key: &str) -> Result<(), SdkError> {
        let api_key = ApiKey::new(key)?;
        let transport = TransportClient::new(self.config.clone(), &api_key)?;

        if self.session.is_some() && matches!(self.cached_token(), Ok(Some(_))) {
            // The cached token is not tied to the key; clear_cache() drops it
            tracing::debug!("API key changed, keeping cached creative token");
        }

        self.session = Some(Session { api_key, transport });
        Ok(())
    }

    /// The current API key.
    pub fn api_key(&self) -> Result<&str, SdkError> {
        self.session
            .as_ref()
            .map(|s| s.api_key.as_str())
            .ok_or(SdkError::NotInitialized)
    }

    /// Whether an API key has been set.
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Rebuild the transport client from the current API key.
    pub fn create_transport_client(&mut self) -> Result<&TransportClient, SdkError> {
        let session = self.session.as_mut().ok_or(SdkError::NotInitialized)?;
        session.transport = TransportClient::new(self.config.clone(), &session.api_key)?;
        Ok(&session.transport)
    }

    fn transport(&self) -> Result<&TransportClient, SdkError> {
        self.session
            .as_ref()
            .map(|s| &s.transport)
            .ok_or(SdkError::NotInitialized)
    }

    /// Set the API key, then fetch the creative token and report retention.
    ///
    /// Fails before touching the store or the network if `api_key` is
    /// empty. Any failure of either step fails the whole call.
    pub async fn initialize(&mut self, api_key: &str) -> Result<InitializeResult, SdkError> {
        self.set_api_key(api_key)?;
        self.create_transport_client()?;

        let token = self.fetch_creative_token().await?;
        let metrics = self.send_user_metrics().await?;

        tracing::info!(metrics_sent = metrics.is_some(), "Geeklab SDK initialized");
        Ok(InitializeResult { token, metrics })
    }

    /// The creative token held in the store, if any.
    pub fn cached_token(&self) -> Result<Option<String>, SdkError> {
        Ok(self
            .store
            .get(CREATIVE_TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    /// Return the cached creative token, fetching and caching one on a miss.
    pub async fn fetch_creative_token(&self) -> Result<String, SdkError> {
        if let Some(token) = self.cached_token()? {
            tracing::debug!("Using cached creative token");
            return Ok(token);
        }

        let transport = self.transport()?;
        let payload = build_token_payload(self.probe.as_ref(), Utc::now());
        let body = transport.post_json(FETCH_TOKEN_PATH, &payload).await?;

        let response: TokenResponse = serde_json::from_value(body)
            .map_err(|e| SdkError::InvalidResponse(format!("no token in response: {e}")))?;
        if response.token.is_empty() {
            return Err(SdkError::InvalidResponse(
                "server returned an empty token".to_string(),
            ));
        }

        self.store.set(CREATIVE_TOKEN_KEY, &response.token)?;
        tracing::info!("Fetched new creative token");
        Ok(response.token)
    }

    /// Report today's retention, at most once per calendar day.
    ///
    /// Returns `None` without any network call if retention was already
    /// reported today. The day is only marked as reported once the webhook
    /// succeeds.
    pub async fn send_user_metrics(&self) -> Result<Option<serde_json::Value>, SdkError> {
        // Fail on a missing key before the first-login bootstrap writes
        self.transport()?;

        let tracker = RetentionTracker::new(self.store.as_ref());
        let Some(plan) = tracker.plan(local_today())? else {
            return Ok(None);
        };

        let payload = serde_json::to_value(plan.result())?;
        let body = self
            .dispatch(RETENTION_EVENT, payload, Some(plan.retention_day.to_string()))
            .await?;

        tracker.commit(&plan)?;
        tracing::info!(
            retention_day = plan.retention_day,
            backfill_day = plan.backfill_day,
            "Sent retention metrics"
        );
        Ok(Some(body))
    }

    /// Send a `custom.purchase` event.
    pub async fn send_custom_purchase_event(
        &self,
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        value: f64,
        currency: impl Into<String>,
        status: impl Into<String>,
    ) -> Result<serde_json::Value, SdkError> {
        let event = PurchaseEvent {
            item_id: item_id.into(),
            item_name: item_name.into(),
            value,
            currency: currency.into(),
            status: status.into(),
        };
        self.send_webhook_request(PURCHASE_EVENT, &event).await
    }

    /// Send a `custom.ad` event.
    pub async fn send_custom_ad_event(&self, event: &AdEvent) -> Result<serde_json::Value, SdkError> {
        self.send_webhook_request(AD_EVENT, event).await
    }

    /// Send one typed event to the webhook endpoint.
    pub async fn send_webhook_request<P: Serialize + ?Sized>(
        &self,
        event_type: &str,
        payload: &P,
    ) -> Result<serde_json::Value, SdkError> {
        if event_type.trim().is_empty() {
            return Err(SdkError::InvalidArgument(
                "event type must not be empty".to_string(),
            ));
        }
        let payload = serde_json::to_value(payload)?;
        self.dispatch(event_type, payload, None).await
    }

    /// Remove the cached token and all retention state.
    pub fn clear_cache(&self) -> Result<(), SdkError> {
        self.store.clear()?;
        tracing::info!("Cleared Geeklab SDK cache");
        Ok(())
    }

    async fn dispatch(
        &self,
        event_type: &str,
        payload: serde_json::Value,
        retention_day: Option<String>,
    ) -> Result<serde_json::Value, SdkError> {
        let transport = self.transport()?;

        let retention_day = match retention_day {
            Some(day) => Some(day),
            None => self.store.get(RETENTION_DAY_KEY)?,
        };
        let creative_token = self.cached_token()?;
        let metrics = self.probe.device_metrics();

        let envelope = WebhookEnvelope {
            event_type: event_type.to_string(),
            created_at: rfc3339(Utc::now()),
            creative_token,
            device_name: metrics.device_name,
            device_model: metrics.device_model,
            os_system: metrics.os_version,
            utc_offset: device::utc_offset(),
            retention_day,
            payload,
        };

        tracing::debug!(event_type, "Dispatching webhook");
        transport.post_json(WEBHOOK_PATH, &envelope).await
    }
}

impl std::fmt::Debug for GeeklabSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeeklabSdk")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
