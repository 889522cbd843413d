//! File-based key-value store adapter.
//!
//! Values are kept as a flat JSON object in `<data_dir>/preferences.json`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::traits::{KeyValueError, KeyValueStore};

/// JSON file backed key-value store.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    guard: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Store at `preferences.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>, KeyValueError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| KeyValueError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(KeyValueError::LoadFailed(e.to_string())),
        }
    }

    async fn save(&self, values: &HashMap<String, String>) -> Result<(), KeyValueError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| KeyValueError::SaveFailed(e.to_string()))?;
        }
        let json = serde_json::to_vec_pretty(values)
            .map_err(|e| KeyValueError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| KeyValueError::SaveFailed(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn read_value(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set_value(&self, key: &str, value: Option<String>) -> Result<(), KeyValueError> {
        let _guard = self.guard.lock().await;
        let mut values = self.load().await.unwrap_or_else(|e| {
            tracing::warn!("Resetting unreadable preferences: {}", e);
            HashMap::new()
        });
        match value {
            Some(value) => values.insert(key.to_string(), value),
            None => values.remove(key),
        };
        self.save(&values).await
    }

    async fn clear(&self) -> Result<(), KeyValueError> {
        let _guard = self.guard.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KeyValueError::SaveFailed(e.to_string())),
        }
    }
}
