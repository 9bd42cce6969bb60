//! Core decision logic for the Geeklab SDK.
//!
//! This module contains:
//! - Daily retention calculation over stored dates
//! - Request payload building for token issuance and webhook events

pub mod payload;
pub mod retention;

// Re-export commonly used types
pub use payload::{
    build_token_payload, AdEvent, PurchaseEvent, TokenPayload, WebhookEnvelope, AD_EVENT,
    PURCHASE_EVENT, RETENTION_EVENT,
};
pub use retention::{local_today, RetentionPlan, RetentionResult, RetentionTracker};
