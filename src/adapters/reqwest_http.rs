//! [`HttpClient`] over reqwest, with the session cookie kept in a
//! [`PersistentCookieJar`].

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::cookie_jar::PersistentCookieJar;
use crate::traits::{FormPart, Headers, HttpClient, HttpError, MultipartForm, Response};

/// Upper bound for one request, media uploads included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Production HTTP client.
///
/// [`HttpClient::clear_cookies`] empties the jar, which is how logout drops
/// the session.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    cookies: Arc<PersistentCookieJar>,
}

impl ReqwestHttpClient {
    /// Cookies live only as long as the client.
    pub fn new() -> Self {
        Self::with_cookie_jar(Arc::new(PersistentCookieJar::in_memory()))
    }

    pub fn with_cookie_jar(jar: Arc<PersistentCookieJar>) -> Self {
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            cookies: jar,
        }
    }

    pub fn cookie_jar(&self) -> &Arc<PersistentCookieJar> {
        &self.cookies
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else if err.is_body() || err.is_decode() {
            HttpError::Io(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Header names come back lower-cased; values that are not visible ASCII are dropped.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        let mut out = Headers::new();
        for (name, value) in headers {
            if let Ok(value) = value.to_str() {
                out.insert(name.as_str().to_string(), value.to_string());
            }
        }
        out
    }

    fn apply_headers(builder: reqwest::RequestBuilder, headers: &Headers) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value))
    }

    fn convert_form(form: MultipartForm) -> Result<reqwest::multipart::Form, HttpError> {
        let mut out = reqwest::multipart::Form::new();
        for part in form.parts {
            out = match part {
                FormPart::Text { name, value } => out.text(name, value),
                FormPart::File {
                    name,
                    filename,
                    mime_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes.to_vec())
                        .file_name(filename)
                        .mime_str(&mime_type)
                        .map_err(|e| HttpError::Other(e.to_string()))?;
                    out.part(name, part)
                }
            };
        }
        Ok(out)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let response = Self::apply_headers(builder, headers)
            .send()
            .await
            .map_err(Self::convert_error)?;
        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;
        tracing::trace!("HTTP {} ({} bytes)", status, body.len());
        Ok(Response::with_headers(status, headers, body))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.send(self.client.get(url), headers).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        self.send(builder, headers).await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.send(self.client.delete(url), headers).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let form = Self::convert_form(form)?;
        self.send(self.client.post(url).multipart(form), headers).await
    }

    async fn put_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let form = Self::convert_form(form)?;
        self.send(self.client.put(url).multipart(form), headers).await
    }

    fn clear_cookies(&self) {
        self.cookies.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_new_starts_without_cookies() {
        let client = ReqwestHttpClient::default();
        assert!(client.cookie_jar().is_empty());
    }

    #[test]
    fn test_convert_headers_lowercases_names() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert("Set-Cookie", "sid=1".parse().unwrap());
        header_map.insert(reqwest::header::CONTENT_TYPE, "application/json".parse().unwrap());

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(headers.get("set-cookie").map(String::as_str), Some("sid=1"));
        assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn test_convert_form_rejects_bad_mime() {
        let form = MultipartForm::new().file("file", "a.bin", "not a mime", Bytes::new());
        assert!(ReqwestHttpClient::convert_form(form).is_err());

        let form = MultipartForm::new()
            .text("text", "hi")
            .file("file", "a.jpg", "image/jpg", Bytes::from_static(b"\x01"));
        assert!(ReqwestHttpClient::convert_form(form).is_ok());
    }

    #[tokio::test]
    async fn test_relative_url_is_invalid() {
        let client = ReqwestHttpClient::new();
        let result = client.get("posts/feed", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_closed_port_fails_to_connect() {
        let client = ReqwestHttpClient::new();
        let result = client
            .delete("http://127.0.0.1:1/v1/posts/p1", &Headers::new())
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }
}
