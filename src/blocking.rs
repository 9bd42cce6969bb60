//! Blocking SDK for use in synchronous contexts.

use crate::config::SdkConfig;
use crate::core::payload::AdEvent;
use crate::device::DeviceProbe;
use crate::error::SdkError;
use crate::service::{GeeklabSdk, InitializeResult};
use crate::store::KeyValueStore;
use serde::Serialize;
use std::sync::Arc;

/// Blocking wrapper around [`GeeklabSdk`].
///
/// Owns a current-thread runtime; must not be used from inside another
/// async runtime.
pub struct BlockingGeeklabSdk {
    inner: GeeklabSdk,
    runtime: tokio::runtime::Runtime,
}

impl BlockingGeeklabSdk {
    /// Create a blocking SDK persisting its state in `config.store_path`.
    pub fn new(config: SdkConfig) -> Result<Self, SdkError> {
        Self::from_sdk(GeeklabSdk::new(config)?)
    }

    /// Create a blocking SDK from explicit collaborators.
    pub fn with_parts(
        config: SdkConfig,
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn DeviceProbe>,
    ) -> Result<Self, SdkError> {
        Self::from_sdk(GeeklabSdk::with_parts(config, store, probe))
    }

    /// Wrap an existing async SDK.
    pub fn from_sdk(inner: GeeklabSdk) -> Result<Self, SdkError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SdkError::Transport(format!("Failed to create runtime: {e}")))?;

        Ok(Self { inner, runtime })
    }

    pub fn set_api_key(&mut self, key: &str) -> Result<(), SdkError> {
        self.inner.set_api_key(key)
    }

    pub fn api_key(&self) -> Result<&str, SdkError> {
        self.inner.api_key()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    pub fn initialize(&mut self, api_key: &str) -> Result<InitializeResult, SdkError> {
        self.runtime.block_on(self.inner.initialize(api_key))
    }

    pub fn cached_token(&self) -> Result<Option<String>, SdkError> {
        self.inner.cached_token()
    }

    pub fn fetch_creative_token(&self) -> Result<String, SdkError> {
        self.runtime.block_on(self.inner.fetch_creative_token())
    }

    pub fn send_user_metrics(&self) -> Result<Option<serde_json::Value>, SdkError> {
        self.runtime.block_on(self.inner.send_user_metrics())
    }

    pub fn send_custom_purchase_event(
        &self,
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        value: f64,
        currency: impl Into<String>,
        status: impl Into<String>,
    ) -> Result<serde_json::Value, SdkError> {
        self.runtime.block_on(
            self.inner
                .send_custom_purchase_event(item_id, item_name, value, currency, status),
        )
    }

    pub fn send_custom_ad_event(&self, event: &AdEvent) -> Result<serde_json::Value, SdkError> {
        self.runtime.block_on(self.inner.send_custom_ad_event(event))
    }

    pub fn send_webhook_request<P: Serialize + ?Sized>(
        &self,
        event_type: &str,
        payload: &P,
    ) -> Result<serde_json::Value, SdkError> {
        self.runtime
            .block_on(self.inner.send_webhook_request(event_type, payload))
    }

    pub fn clear_cache(&self) -> Result<(), SdkError> {
        self.inner.clear_cache()
    }

    /// The wrapped async SDK.
    pub fn inner(&self) -> &GeeklabSdk {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SystemProbe;
    use crate::store::{MemoryStore, CREATIVE_TOKEN_KEY};

    #[test]
    fn test_blocking_initialize_rejects_empty_key() {
        let mut sdk = BlockingGeeklabSdk::with_parts(
            SdkConfig::with_base_url("http://127.0.0.1:9"),
            Arc::new(MemoryStore::new()),
            Arc::new(SystemProbe::new()),
        )
        .unwrap();

        let err = sdk.initialize("").unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument(_)));
        assert!(!sdk.is_initialized());
    }

    #[test]
    fn test_blocking_cached_token() {
        let store = Arc::new(MemoryStore::with_entries([(CREATIVE_TOKEN_KEY, "tok")]));
        let sdk = BlockingGeeklabSdk::with_parts(
            SdkConfig::default(),
            store,
            Arc::new(SystemProbe::new()),
        )
        .unwrap();

        assert_eq!(sdk.fetch_creative_token().unwrap(), "tok");
    }
}
