use std::sync::Arc;

use crate::api::{AccountUpdate, ApiClient};
use crate::cache::Store;
use crate::domain::{data_stream, DataState, DataStream, StateMessage};
use crate::error::messages::*;
use crate::error::{handle_use_case_error, InteractorError};
use crate::models::Account;

/// The signed-in account, refreshed from the server.
#[derive(Debug, Clone)]
pub struct GetAccount {
    api: ApiClient,
    store: Arc<Store>,
}

impl GetAccount {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self) -> DataStream<Account> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Account, InteractorError> = async {
                let account = api.get_current_account().await?;
                store.upsert_account(&account)?;
                store.get_account(&account.id)?.ok_or_else(|| {
                    InteractorError::Message(ERROR_UNABLE_TO_RETRIEVE_ACCOUNT_DETAILS.to_string())
                })
            }
            .await;
            match result {
                Ok(account) => DataState::data(account),
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct GetAccountFromCache {
    store: Arc<Store>,
}

impl GetAccountFromCache {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn execute(&self, id: String) -> DataStream<Account> {
        let store = self.store.clone();
        data_stream(async move {
            let result = store
                .get_account(&id)
                .map_err(InteractorError::from)
                .and_then(|account| {
                    account.ok_or_else(|| {
                        InteractorError::Message(
                            ERROR_UNABLE_TO_RETRIEVE_ACCOUNT_DETAILS.to_string(),
                        )
                    })
                });
            match result {
                Ok(account) => DataState::data(account),
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

/// Save profile edits (and optional new images) on the server.
#[derive(Debug, Clone)]
pub struct UpdateAccount {
    api: ApiClient,
    store: Arc<Store>,
}

impl UpdateAccount {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, update: AccountUpdate) -> DataStream<Account> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Account, InteractorError> = async {
                let account = api.update_account(&update).await?;
                if !store.update_account(&account)? {
                    store.upsert_account(&account)?;
                }
                Ok(account)
            }
            .await;
            match result {
                Ok(account) => {
                    tracing::info!("Updated account {}", account.username);
                    DataState::data_with_message(
                        Some(account),
                        StateMessage::success_snackbar(SUCCESS_ACCOUNT_UPDATED),
                    )
                }
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::api::test_support::account_json;
    use crate::domain::UiComponentType;
    use crate::interactors::test_support::{run, setup, url};
    use crate::models::fixtures::account;

    #[tokio::test]
    async fn test_get_account_caches() {
        let (http, api, store) = setup();
        http.set_response(
            &url("accounts"),
            MockResponse::json(200, &account_json("a1", "alice")),
        );

        let state = run(GetAccount::new(api, store.clone()).execute()).await;
        assert_eq!(state.data_ref().unwrap().username, "alice");
        assert!(store.get_account("a1").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_account_unauthorized() {
        let (http, api, store) = setup();
        http.set_default_response(MockResponse::status(401, ""));

        let state = run(GetAccount::new(api, store).execute()).await;
        assert_eq!(state.message().unwrap().message, UNAUTHORIZED_ERROR);
    }

    #[tokio::test]
    async fn test_get_account_from_cache() {
        let (_, _, store) = setup();
        store.upsert_account(&account("a1", "alice")).unwrap();
        let get = GetAccountFromCache::new(store);

        let found = run(get.execute("a1".into())).await;
        assert_eq!(found.data_ref().unwrap().id, "a1");

        let missing = run(get.execute("a2".into())).await;
        assert_eq!(
            missing.message().unwrap().message,
            ERROR_UNABLE_TO_RETRIEVE_ACCOUNT_DETAILS
        );
    }

    #[tokio::test]
    async fn test_update_account() {
        let (http, api, store) = setup();
        store.upsert_account(&account("a1", "alice")).unwrap();
        let mut answer = account_json("a1", "alice");
        answer["bio"] = "hello".into();
        http.set_method_response("PUT", &url("accounts"), MockResponse::json(200, &answer));

        let update = AccountUpdate {
            email: "alice@mirage.test".into(),
            username: "alice".into(),
            display_name: "alice name".into(),
            bio: Some("hello".into()),
            ..AccountUpdate::default()
        };
        let state = run(UpdateAccount::new(api, store.clone()).execute(update)).await;

        let message = state.message().unwrap();
        assert_eq!(message.message, SUCCESS_ACCOUNT_UPDATED);
        assert_eq!(message.ui_component_type, UiComponentType::Snackbar);
        assert_eq!(
            store.get_account("a1").unwrap().unwrap().bio.as_deref(),
            Some("hello")
        );
    }

    #[tokio::test]
    async fn test_update_account_conflict() {
        let (http, api, store) = setup();
        http.set_default_response(MockResponse::status(
            409,
            r#"{"error":{"type":"CONFLICT","message":"username already taken"}}"#,
        ));

        let state = run(UpdateAccount::new(api, store).execute(AccountUpdate::default())).await;
        assert_eq!(state.message().unwrap().message, ERROR_USERNAME_IN_USE);
    }
}
