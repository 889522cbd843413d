use super::{ApiClient, LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::models::Account;

impl ApiClient {
    /// POST accounts/login
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: super::AccountResponse = self.post_json("accounts/login", &body).await?;
        Ok(response.into())
    }

    /// POST accounts/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<Account, ApiError> {
        let response: super::AccountResponse =
            self.post_json("accounts/register", request).await?;
        Ok(response.into())
    }

    /// POST accounts/logout
    pub async fn logout(&self) -> Result<bool, ApiError> {
        self.post_empty("accounts/logout").await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::api::test_support::{account_json, BASE};

    #[tokio::test]
    async fn test_login_sends_credentials() {
        let http = Arc::new(MockHttpClient::new());
        http.set_response(
            "https://api.test/v1/accounts/login",
            MockResponse::json(200, &account_json("a1", "alice")),
        );
        let api = ApiClient::new(BASE, http.clone());

        let account = api.login("alice@mirage.test", "hunter22").await.unwrap();
        assert_eq!(account.username, "alice");

        let request = &http.get_requests()[0];
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "alice@mirage.test");
        assert_eq!(body["password"], "hunter22");
    }

    #[tokio::test]
    async fn test_register_unauthorized() {
        let http = Arc::new(MockHttpClient::new());
        http.set_default_response(MockResponse::status(401, ""));
        let api = ApiClient::new(BASE, http);

        let request = RegisterRequest {
            email: "a@b.c".into(),
            username: "alice".into(),
            display_name: "Alice".into(),
            password: "secret".into(),
        };
        assert!(api.register(&request).await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_logout_returns_flag() {
        let http = Arc::new(MockHttpClient::new());
        http.set_response(
            "https://api.test/v1/accounts/logout",
            MockResponse::status(200, "true"),
        );
        let api = ApiClient::new(BASE, http);
        assert!(api.logout().await.unwrap());
    }
}
