//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, DELETE, multipart)
//! - [`KeyValueStore`] - Small persisted preferences map

pub mod http;
pub mod kv_store;

pub use http::{FormPart, Headers, HttpClient, HttpError, MultipartForm, Response};
pub use kv_store::{KeyValueError, KeyValueStore, PREVIOUS_AUTH_USER};
