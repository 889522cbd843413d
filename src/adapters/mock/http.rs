//! Scripted [`HttpClient`] for unit tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{Headers, HttpClient, HttpError, MultipartForm, Response};

/// One call the client received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// JSON body of a plain POST
    pub body: Option<String>,
    pub form: Option<MultipartForm>,
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Any status, 4xx and 5xx included
    Success(Response),
    Error(HttpError),
}

impl MockResponse {
    /// Response with a JSON body.
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        MockResponse::Success(Response::json_body(status, value))
    }

    /// Response with a status and a plain body.
    pub fn status(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }
}

/// Records every request and answers from a table.
///
/// Responses are looked up by `"METHOD url"` first, then by URL alone, then
/// by the longest configured URL prefix, and finally the default response.
///
/// # Example
///
/// ```ignore
/// use mirage::adapters::mock::{MockHttpClient, MockResponse};
/// use mirage::traits::{HttpClient, Headers};
///
/// let client = MockHttpClient::new();
/// client.set_response("https://api.test/v1/posts/p1", MockResponse::status(404, ""));
///
/// let response = client.get("https://api.test/v1/posts/p1", &Headers::new()).await?;
/// assert_eq!(response.status, 404);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    /// Keyed by `"METHOD url"` or by url alone
    responses: HashMap<String, MockResponse>,
    fallback: Option<MockResponse>,
    requests: Vec<RecordedRequest>,
    cookie_clears: usize,
}

impl MockState {
    fn lookup(&self, method: &str, url: &str) -> Option<MockResponse> {
        let exact = self
            .responses
            .get(&format!("{} {}", method, url))
            .or_else(|| self.responses.get(url));
        // Longest matching prefix, so `/posts/p1/like` beats `/posts/p1`
        let prefixed = || {
            self.responses
                .iter()
                .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
                .max_by_key(|(pattern, _)| pattern.len())
                .map(|(_, response)| response)
        };
        exact
            .or_else(prefixed)
            .or(self.fallback.as_ref())
            .cloned()
    }
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer `url` for any method.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.state().responses.insert(url.to_string(), response);
    }

    pub fn set_method_response(&self, method: &str, url: &str, response: MockResponse) {
        self.state()
            .responses
            .insert(format!("{} {}", method, url), response);
    }

    /// Answer for urls nothing else matches.
    pub fn set_default_response(&self, response: MockResponse) {
        self.state().fallback = Some(response);
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    pub fn clear_responses(&self) {
        self.state().responses.clear();
    }

    /// How many times the session cookie was dropped.
    pub fn cookie_clear_count(&self) -> usize {
        self.state().cookie_clears
    }

    fn exchange(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<String>,
        form: Option<MultipartForm>,
    ) -> Result<Response, HttpError> {
        let mut state = self.state();
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
            form,
        });
        match state.lookup(method, url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("no mock response for {} {}", method, url))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.exchange("GET", url, headers, None, None)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.exchange("POST", url, headers, Some(body.to_string()), None)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.exchange("DELETE", url, headers, None, None)
    }

    async fn post_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.exchange("POST", url, headers, None, Some(form))
    }

    async fn put_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.exchange("PUT", url, headers, None, Some(form))
    }

    fn clear_cookies(&self) {
        self.state().cookie_clears += 1;
    }
}
