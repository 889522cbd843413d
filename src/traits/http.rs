//! The HTTP seam between the API client and the network.
//!
//! [`ApiClient`](crate::api::ApiClient) only ever talks to an [`HttpClient`],
//! so tests swap in [`MockHttpClient`](crate::adapters::mock::MockHttpClient)
//! and production uses reqwest.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;

/// Request or response headers by name.
pub type Headers = HashMap<String, String>;

/// Status, headers and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self::with_headers(status, Headers::new(), body)
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// `value` serialized as the body, tagged `application/json`.
    pub fn json_body<T: serde::Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let headers = Headers::from([("content-type".to_string(), "application/json".to_string())]);
        Self::with_headers(status, headers, Bytes::from(body))
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Body as text, replacing invalid UTF-8. Error bodies are kept this way.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// Plain text field
    Text { name: String, value: String },
    /// File field
    File {
        name: String,
        filename: String,
        mime_type: String,
        bytes: Bytes,
    },
}

impl FormPart {
    /// Field name of this part.
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// A `multipart/form-data` request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        });
        self
    }

    /// Value of a text field, if present.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Whether a part with this name exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|part| part.name() == name)
    }
}

/// Transport failures. A server that answered, whatever the status, is not
/// an error at this layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    #[error("could not reach the server: {0}")]
    ConnectionFailed(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("failed reading the response: {0}")]
    Io(String),

    #[error("bad request url: {0}")]
    InvalidUrl(String),

    #[error("http failure: {0}")]
    Other(String),
}

/// What the API client needs from an HTTP stack.
///
/// Non-2xx statuses are returned as a [`Response`], not as an error; only
/// transport failures produce [`HttpError`]. Session cookies are owned by
/// the implementation.
///
/// ```ignore
/// use mirage::traits::{Headers, HttpClient};
///
/// let response = client.get("http://localhost:8080/v1/posts/feed", &Headers::new()).await?;
/// if response.is_success() {
///     let page: PostListResponse = response.json()?;
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// POST with a JSON string body.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// POST `multipart/form-data`, used to publish posts with media.
    async fn post_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<Response, HttpError>;

    /// PUT `multipart/form-data`, used for account edits.
    async fn put_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<Response, HttpError>;

    /// Drop any session cookies held by the client.
    fn clear_cookies(&self) {}
}
