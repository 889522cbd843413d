//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`PersistentCookieJar`] - Clearable, file-backed session cookies
//! - [`FileKeyValueStore`] - JSON file preferences
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::InMemoryKeyValueStore`] - In-memory preferences

pub mod cookie_jar;
pub mod file_kv_store;
pub mod mock;
pub mod reqwest_http;

pub use cookie_jar::PersistentCookieJar;
pub use file_kv_store::FileKeyValueStore;
pub use mock::{InMemoryKeyValueStore, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
