//! Key-value store trait abstraction.
//!
//! A tiny persisted map used for session bookkeeping, such as the username
//! of the last authenticated user.

use async_trait::async_trait;

/// Key under which the last authenticated username is stored.
pub const PREVIOUS_AUTH_USER: &str = "previous_auth_user";

/// Key-value store errors.
#[derive(Debug, Clone)]
pub enum KeyValueError {
    /// Reading the backing storage failed
    LoadFailed(String),
    /// Writing the backing storage failed
    SaveFailed(String),
    /// Stored data could not be (de)serialized
    Serialization(String),
}

impl std::fmt::Display for KeyValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValueError::LoadFailed(msg) => write!(f, "Failed to load preferences: {}", msg),
            KeyValueError::SaveFailed(msg) => write!(f, "Failed to save preferences: {}", msg),
            KeyValueError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for KeyValueError {}

/// Trait for a small persistent string map.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when unset.
    async fn read_value(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    /// Set a value; `None` removes the key.
    async fn set_value(&self, key: &str, value: Option<String>) -> Result<(), KeyValueError>;

    /// Remove every key.
    async fn clear(&self) -> Result<(), KeyValueError>;
}
