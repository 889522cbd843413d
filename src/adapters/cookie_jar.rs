//! Persistent session cookie jar.
//!
//! reqwest's built-in jar cannot be cleared or saved, so the client uses
//! this store instead. Matching and expiry follow RFC 6265 via
//! `cookie_store`; the jar is written to a JSON file after every change,
//! which keeps the session alive across restarts.

use cookie_store::CookieStore as CookieSet;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use reqwest_cookie_store::CookieStoreRwLock;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

/// Cookie store that can be cleared and optionally persists to disk.
pub struct PersistentCookieJar {
    store: CookieStoreRwLock,
    path: Option<PathBuf>,
}

impl fmt::Debug for PersistentCookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCookieJar")
            .field("cookies", &self.len())
            .field("path", &self.path)
            .finish()
    }
}

impl Default for PersistentCookieJar {
    fn default() -> Self {
        Self {
            store: CookieStoreRwLock::new(CookieSet::default()),
            path: None,
        }
    }
}

impl PersistentCookieJar {
    /// Jar that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load a jar from `path`, starting empty when the file is missing or
    /// unreadable. Expired cookies are dropped on load.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cookies = match File::open(&path) {
            Ok(file) => CookieSet::load_json(BufReader::new(file)).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable cookie file {}: {}", path.display(), e);
                CookieSet::default()
            }),
            Err(_) => CookieSet::default(),
        };

        Self {
            store: CookieStoreRwLock::new(cookies),
            path: Some(path),
        }
    }

    /// Forget every cookie.
    pub fn clear(&self) {
        let mut store = self.write();
        store.clear();
        self.persist(&store);
    }

    /// Number of unexpired cookies across all hosts.
    pub fn len(&self) -> usize {
        self.read().iter_unexpired().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the cookie `name` that would be sent to `url`.
    pub fn get(&self, url: &Url, name: &str) -> Option<String> {
        self.read()
            .get_request_values(url)
            .find(|(cookie, _)| *cookie == name)
            .map(|(_, value)| value.to_string())
    }

    fn read(&self) -> RwLockReadGuard<'_, CookieSet> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CookieSet> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Session cookies carry no expiry, so they are saved too.
    fn persist(&self, store: &CookieSet) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let result = File::create(path)
            .map_err(|e| e.to_string())
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                store
                    .save_incl_expired_and_nonpersistent_json(&mut writer)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            tracing::warn!("Failed to persist cookies to {}: {}", path.display(), e);
        }
    }
}

impl CookieStore for PersistentCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&HeaderValue> = cookie_headers.collect();
        if headers.is_empty() {
            return;
        }
        CookieStore::set_cookies(&self.store, &mut headers.into_iter(), url);
        tracing::debug!("Stored session cookies for {}", url.host_str().unwrap_or(""));
        self.persist(&self.read());
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        CookieStore::cookies(&self.store, url)
    }
}
