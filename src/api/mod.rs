//! Typed client for the Mirage REST API.
//!
//! [`ApiClient`] turns endpoint calls into [`HttpClient`] requests and decodes
//! the JSON answers. Any non-2xx status comes back as [`ApiError::Status`]
//! carrying the raw body, which the error handling layer parses into
//! user-facing text. The session cookie is handled by the HTTP layer.

mod account;
mod auth;
pub mod dto;
mod posts;
mod profiles;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::traits::{Headers, HttpClient, MultipartForm, Response};

pub use dto::{
    AccountResponse, AccountUpdate, AttachmentDto, LoginRequest, MediaUpload, PostDto,
    PostListResponse, ProfileDto, RegisterRequest,
};
pub use profiles::ProfileTab;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/v1/";

/// Client for the Mirage API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `https://host/v1/`).
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forget the session cookie.
    pub fn clear_session(&self) {
        self.http.clear_cookies();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url, &Self::headers()).await?;
        decode(response)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let body = serde_json::to_string(body)?;
        let response = self.http.post(&url, &body, &Self::headers()).await?;
        decode(response)
    }

    /// POST with an empty body, used by the toggle endpoints.
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self.http.post(&url, "", &Self::headers()).await?;
        decode(response)
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);
        let response = self.http.delete(&url, &Self::headers()).await?;
        decode(response)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("POST {} (multipart, {} parts)", url, form.parts.len());
        let response = self.http.post_multipart(&url, form, &Self::headers()).await?;
        decode(response)
    }

    async fn put_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("PUT {} (multipart, {} parts)", url, form.parts.len());
        let response = self.http.put_multipart(&url, form, &Self::headers()).await?;
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            body: response.text_lossy(),
        });
    }
    Ok(response.json()?)
}

/// Path segment with reserved characters escaped.
fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `path` with a `?cursor=` query when a cursor is given.
fn with_cursor(path: String, cursor: Option<&str>) -> String {
    match cursor {
        Some(cursor) => {
            let sep = if path.contains('?') { '&' } else { '?' };
            format!("{}{}cursor={}", path, sep, urlencoding::encode(cursor))
        }
        None => path,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};

    pub const BASE: &str = "https://api.test/v1/";

    pub fn profile_json(id: &str, username: &str) -> Value {
        json!({
            "id": id,
            "username": username,
            "displayName": format!("{} name", username),
            "image": format!("https://img.test/{}.png", id),
            "bio": null,
            "banner": null,
            "followers": 0,
            "followee": 0,
            "following": false,
            "created_at": "2020-01-01T00:00:00Z"
        })
    }

    pub fn post_json(id: &str, author_id: &str, created_at: &str) -> Value {
        json!({
            "id": id,
            "text": format!("post {}", id),
            "likes": 0,
            "liked": false,
            "retweets": 0,
            "retweeted": false,
            "isRetweet": false,
            "file": null,
            "files": [],
            "author": profile_json(author_id, &format!("user{}", author_id)),
            "created_at": created_at
        })
    }

    pub fn account_json(id: &str, username: &str) -> Value {
        json!({
            "id": id,
            "email": format!("{}@mirage.test", username),
            "username": username,
            "displayName": format!("{} name", username),
            "bio": null,
            "banner": null,
            "image": format!("https://img.test/{}.png", id)
        })
    }

    pub fn page_json(posts: Vec<Value>, has_more: bool) -> Value {
        json!({ "posts": posts, "hasMore": has_more })
    }
}
