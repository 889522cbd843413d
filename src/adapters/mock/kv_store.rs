//! In-memory key-value store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{KeyValueError, KeyValueStore};

/// Key-value store held in memory, with switchable save failures.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    save_should_fail: Arc<AtomicBool>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.lock().insert(key.to_string(), value.to_string());
        store
    }

    /// Configure whether writes should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        self.save_should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Synchronous peek for assertions.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_save(&self) -> Result<(), KeyValueError> {
        if self.save_should_fail.load(Ordering::SeqCst) {
            return Err(KeyValueError::SaveFailed("Mock save failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn read_value(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        Ok(self.get(key))
    }

    async fn set_value(&self, key: &str, value: Option<String>) -> Result<(), KeyValueError> {
        self.check_save()?;
        let mut values = self.lock();
        match value {
            Some(value) => values.insert(key.to_string(), value),
            None => values.remove(key),
        };
        Ok(())
    }

    async fn clear(&self) -> Result<(), KeyValueError> {
        self.check_save()?;
        self.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_read_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.read_value("k").await.unwrap(), None);

        store.set_value("k", Some("v".to_string())).await.unwrap();
        assert_eq!(store.read_value("k").await.unwrap(), Some("v".to_string()));

        store.set_value("k", None).await.unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[tokio::test]
    async fn test_save_failure() {
        let store = InMemoryKeyValueStore::with_value("k", "v");
        store.set_save_should_fail(true);

        assert!(store.set_value("k", None).await.is_err());
        assert!(store.clear().await.is_err());
        assert_eq!(store.get("k"), Some("v".to_string()));
    }
}
