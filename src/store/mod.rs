//! Persistent key-value storage for SDK state.
//!
//! The SDK keeps all durable state (creative token, retention dates) as
//! string values behind the [`KeyValueStore`] trait, so hosts can swap in
//! their own backend.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Store key for the cached creative token.
pub const CREATIVE_TOKEN_KEY: &str = "creativeToken";
/// Store key for the first observed login date.
pub const FIRST_LOGIN_DATE_KEY: &str = "firstLoginDate";
/// Store key for the date retention was last reported.
pub const LAST_SENT_METRIC_DATE_KEY: &str = "lastSentMetricDate";
/// Store key for the last reported retention day.
pub const RETENTION_DAY_KEY: &str = "retentionDay";

/// A scoped string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove every value in this store's scope.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Storage errors.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    Io(std::io::Error),
    /// The backing file exists but is not a valid store.
    Corrupt(String),
    /// A lock guarding the store was poisoned by a panicking writer.
    Poisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Storage IO error: {e}"),
            StoreError::Corrupt(msg) => write!(f, "Storage corrupt: {msg}"),
            StoreError::Poisoned => write!(f, "Storage lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}
