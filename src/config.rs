//! Client configuration.
//!
//! Where the API lives and where local state (cache database, cookies,
//! preferences) is kept on disk.

use std::path::{Path, PathBuf};

pub use crate::api::DEFAULT_API_URL;
use crate::domain::PAGE_SIZE;

/// Environment variable overriding [`ClientConfig::api_url`].
pub const API_URL_ENV: &str = "MIRAGE_API_URL";

/// Environment variable overriding [`ClientConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "MIRAGE_DATA_DIR";

const DATABASE_FILE: &str = "mirage.db";
const COOKIE_FILE: &str = "cookies.json";

/// Configuration for the client core.
///
/// Use the builder methods to customize it.
///
/// # Example
///
/// ```
/// use mirage::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_url("https://mirage.example/v1")
///     .with_data_dir("/tmp/mirage");
/// assert_eq!(config.api_url, "https://mirage.example/v1/");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root, always ending in `/`
    pub api_url: String,
    /// Directory holding the cache database, cookies and preferences
    pub data_dir: PathBuf,
    /// File name of the cache database inside `data_dir`
    pub database_file: String,
    /// Rows per page for cache queries
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            database_file: DATABASE_FILE.to_string(),
            page_size: PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `MIRAGE_API_URL` and `MIRAGE_DATA_DIR` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_url(url);
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_data_dir(dir);
        }
        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.api_url = url;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_database_file(mut self, file: impl Into<String>) -> Self {
        self.database_file = file.into();
        self
    }

    /// Page size for cache queries. Zero is ignored.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn cookie_path(&self) -> PathBuf {
        self.data_dir.join(COOKIE_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("mirage"))
        .unwrap_or_else(|| PathBuf::from(".mirage"))
}
