//! Error types for the Geeklab SDK.
//!
//! Every failed HTTP call is reduced to one [`SdkError`] whose `Display`
//! output is the human-readable message handed back to the caller.

use crate::store::StoreError;

/// Errors returned by SDK operations.
#[derive(Debug)]
pub enum SdkError {
    /// A caller-supplied argument was rejected (e.g. an empty API key).
    InvalidArgument(String),
    /// No API key has been set yet.
    NotInitialized,
    /// The server rejected the API key (HTTP 401).
    Auth,
    /// The server rejected the request body (HTTP 400).
    BadRequest,
    /// The endpoint was not found (HTTP 404).
    NotFound(String),
    /// The server failed (HTTP 5xx).
    Server { status: u16, body: String },
    /// Any other non-success status.
    Http { status: u16, body: String },
    /// No response was received.
    Network(String),
    /// The HTTP client could not be constructed.
    Transport(String),
    /// A request or response body could not be (de)serialized.
    Serialization(String),
    /// A 2xx response whose body could not be used.
    InvalidResponse(String),
    /// The local store failed.
    Storage(StoreError),
}

impl SdkError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => SdkError::Auth,
            400 => SdkError::BadRequest,
            404 => SdkError::NotFound(body),
            s if s >= 500 => SdkError::Server { status: s, body },
            s => SdkError::Http { status: s, body },
        }
    }

    /// Whether this error is a configuration problem on the caller's side.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SdkError::InvalidArgument(_) | SdkError::NotInitialized)
    }

    /// HTTP status that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Auth => Some(401),
            SdkError::BadRequest => Some(400),
            SdkError::NotFound(_) => Some(404),
            SdkError::Server { status, .. } | SdkError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdkError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            SdkError::NotInitialized => {
                write!(f, "SDK is not initialized. Call initialize() with an API key first.")
            }
            SdkError::Auth => write!(f, "API key is not valid."),
            SdkError::BadRequest => write!(f, "Bad request, data not formatted properly."),
            SdkError::NotFound(body) => write!(f, "Request failed: {body}"),
            SdkError::Server { body, .. } => write!(f, "Server error: {body}"),
            SdkError::Http { status, body } => write!(f, "Request failed: {status} {body}"),
            SdkError::Network(_) => write!(f, "Failed to communicate with the server."),
            SdkError::Transport(msg) => write!(f, "{msg}"),
            SdkError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            SdkError::InvalidResponse(msg) => write!(f, "Invalid server response: {msg}"),
            SdkError::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SdkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SdkError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for SdkError {
    fn from(e: StoreError) -> Self {
        SdkError::Storage(e)
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SdkError::InvalidResponse(e.to_string())
        } else {
            SdkError::Network(e.to_string())
        }
    }
}
