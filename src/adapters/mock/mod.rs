//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`InMemoryKeyValueStore`] - In-memory preferences

pub mod http;
pub mod kv_store;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use kv_store::InMemoryKeyValueStore;
