//! Geeklab SDK - client-side analytics for creative campaigns.
//!
//! This library fetches a session-scoped creative token, reports daily
//! user retention and forwards custom business events (purchases, ad
//! impressions) to the Geeklab analytics endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         GeeklabSdk                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │  Retention  │   │   Payload   │──▶│  Transport  │──▶ HTTP│
//! │  │  Tracker    │   │   Builder   │   │  (API key)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         │                 ▲                                 │
//! │         ▼                 │                                 │
//! │  ┌─────────────┐   ┌─────────────┐                         │
//! │  │  Key-Value  │   │   Device    │                         │
//! │  │    Store    │   │   Probe     │                         │
//! │  └─────────────┘   └─────────────┘                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use geeklab_sdk::{GeeklabSdk, SdkConfig};
//!
//! # async fn run() -> Result<(), geeklab_sdk::SdkError> {
//! let mut sdk = GeeklabSdk::new(SdkConfig::default())?;
//!
//! // Fetches (or reuses) the creative token and reports today's retention
//! let init = sdk.initialize("my-api-key").await?;
//! println!("creative token: {}", init.token);
//!
//! sdk.send_custom_purchase_event("item123", "Premium", 9.99, "USD", "completed")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod service;
pub mod store;
pub mod transport;

// Re-export key types at crate root for convenience
pub use blocking::BlockingGeeklabSdk;
pub use config::{ConfigError, SdkConfig};
pub use crate::core::{AdEvent, PurchaseEvent, RetentionResult, RetentionTracker, TokenPayload};
pub use device::{DeviceMetrics, DeviceProbe, SystemProbe};
pub use error::SdkError;
pub use service::{GeeklabSdk, InitializeResult};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use transport::{ApiKey, TransportClient};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Notice describing what the SDK sends, for display to end users.
pub const DATA_COLLECTION_NOTICE: &str = r#"
This application uses the Geeklab SDK to measure campaign performance.

What is sent:
  - A campaign identifier (creative token) issued by Geeklab
  - Device name, device model and operating system
  - Timezone, UTC offset and preferred language
  - Days since first use (sent at most once per day)
  - Purchase and ad events reported by this application

What is never sent:
  - Files, keystrokes or screen content
  - The API key of this application in any event body
"#;
