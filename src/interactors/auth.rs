use std::sync::Arc;

use crate::api::{ApiClient, RegisterRequest};
use crate::cache::Store;
use crate::domain::{data_stream, DataState, DataStream, MessageType, StateMessage, UiComponentType};
use crate::error::handling::login_error_message;
use crate::error::messages::*;
use crate::error::{handle_use_case_error, InteractorError};
use crate::models::Account;
use crate::traits::{KeyValueStore, PREVIOUS_AUTH_USER};

/// Cache the account and remember it for the next launch.
async fn remember_account(
    store: &Store,
    prefs: &dyn KeyValueStore,
    account: &Account,
) -> Result<(), InteractorError> {
    store.upsert_account(account).map_err(|e| {
        tracing::error!("Failed to cache account {}: {}", account.username, e);
        InteractorError::Message(ERROR_SAVE_AUTH_TOKEN.to_string())
    })?;
    prefs
        .set_value(PREVIOUS_AUTH_USER, Some(account.username.clone()))
        .await?;
    Ok(())
}

#[derive(Clone)]
pub struct Login {
    api: ApiClient,
    store: Arc<Store>,
    prefs: Arc<dyn KeyValueStore>,
}

impl Login {
    pub fn new(api: ApiClient, store: Arc<Store>, prefs: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store, prefs }
    }

    pub fn execute(&self, email: String, password: String) -> DataStream<Account> {
        let api = self.api.clone();
        let store = self.store.clone();
        let prefs = self.prefs.clone();
        data_stream(async move {
            let result: Result<Account, InteractorError> = async {
                let account = api.login(&email, &password).await?;
                remember_account(&store, prefs.as_ref(), &account).await?;
                Ok(account)
            }
            .await;
            match result {
                Ok(account) => {
                    tracing::info!("Logged in as {}", account.username);
                    DataState::data(account)
                }
                Err(InteractorError::Message(message)) => {
                    DataState::error(StateMessage::error_dialog(message))
                }
                Err(err) => {
                    tracing::warn!("Login failed (status {:?}): {}", err.status(), err);
                    DataState::error(StateMessage::error_dialog(login_error_message(&err)))
                }
            }
        })
    }
}

#[derive(Clone)]
pub struct Register {
    api: ApiClient,
    store: Arc<Store>,
    prefs: Arc<dyn KeyValueStore>,
}

impl Register {
    pub fn new(api: ApiClient, store: Arc<Store>, prefs: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store, prefs }
    }

    pub fn execute(&self, request: RegisterRequest) -> DataStream<Account> {
        let api = self.api.clone();
        let store = self.store.clone();
        let prefs = self.prefs.clone();
        data_stream(async move {
            let result: Result<Account, InteractorError> = async {
                let account = api.register(&request).await?;
                remember_account(&store, prefs.as_ref(), &account).await?;
                Ok(account)
            }
            .await;
            match result {
                Ok(account) => {
                    tracing::info!("Registered {}", account.username);
                    DataState::data(account)
                }
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

/// End the session: server logout, then every local trace of the user.
#[derive(Clone)]
pub struct Logout {
    api: ApiClient,
    store: Arc<Store>,
    prefs: Arc<dyn KeyValueStore>,
}

impl Logout {
    pub fn new(api: ApiClient, store: Arc<Store>, prefs: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store, prefs }
    }

    pub fn execute(&self) -> DataStream<()> {
        let api = self.api.clone();
        let store = self.store.clone();
        let prefs = self.prefs.clone();
        data_stream(async move {
            // The local session ends even when the server is unreachable
            if let Err(e) = api.logout().await {
                tracing::warn!("Server logout failed: {}", e);
            }
            api.clear_session();

            let result: Result<(), InteractorError> = async {
                prefs.clear().await?;
                store.clear_all()?;
                Ok(())
            }
            .await;
            match result {
                Ok(()) => {
                    tracing::info!("Logged out");
                    DataState::data_with_message(
                        Some(()),
                        StateMessage::silent_success(SUCCESS_LOGOUT),
                    )
                }
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

/// Look up the account remembered from the last session.
///
/// A miss is not a failure the user should see: it ends with an `Error`
/// carrying a `None` presentation, which tells the session the check is done.
#[derive(Debug, Clone)]
pub struct CheckPreviousAuthUser {
    store: Arc<Store>,
}

impl CheckPreviousAuthUser {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn done_message() -> StateMessage {
        StateMessage::new(
            RESPONSE_CHECK_PREVIOUS_AUTH_USER_DONE,
            UiComponentType::None,
            MessageType::Error,
        )
    }

    pub fn execute(&self, username: String) -> DataStream<Account> {
        let store = self.store.clone();
        data_stream(async move {
            match store.get_account_by_username(&username) {
                Ok(Some(account)) => DataState::data(account),
                Ok(None) => {
                    tracing::debug!("{}", ERROR_NO_PREVIOUS_AUTH_USER);
                    DataState::error(Self::done_message())
                }
                Err(e) => {
                    tracing::warn!("Previous user lookup failed: {}", e);
                    DataState::error(Self::done_message())
                }
            }
        })
    }
}
