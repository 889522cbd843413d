//! Who is signed in.
//!
//! The [`SessionManager`] is shared by every screen: the login screens feed it
//! the authenticated account, the account screen asks it to log out, and the
//! host watches `uid` to choose between the auth and main flows.

use std::sync::Arc;

use super::screen::{Screen, ScreenState};
use crate::domain::MessageQueue;
use crate::error::ScreenError;
use crate::interactors::{CheckPreviousAuthUser, Logout};
use crate::models::Account;
use crate::traits::{KeyValueStore, PREVIOUS_AUTH_USER};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub is_loading: bool,
    /// Id of the signed-in account
    pub uid: Option<String>,
    /// Startup lookup of the remembered user has finished
    pub did_check_for_previous_auth_user: bool,
    pub queue: MessageQueue,
}

impl ScreenState for SessionState {
    fn queue(&self) -> &MessageQueue {
        &self.queue
    }
    fn queue_mut(&mut self) -> &mut MessageQueue {
        &mut self.queue
    }
    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Login(Account),
    Logout,
    CheckPreviousAuthUser(String),
    OnRemoveHeadFromQueue,
}

pub struct SessionManager {
    screen: Screen<SessionState, SessionEvent>,
    check_previous_auth_user: CheckPreviousAuthUser,
    logout: Logout,
    prefs: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(
        check_previous_auth_user: CheckPreviousAuthUser,
        logout: Logout,
        prefs: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            screen: Screen::new(SessionState::default()),
            check_previous_auth_user,
            logout,
            prefs,
        }
    }

    pub fn screen(&self) -> &Screen<SessionState, SessionEvent> {
        &self.screen
    }

    pub fn state(&self) -> SessionState {
        self.screen.snapshot()
    }

    pub fn uid(&self) -> Option<String> {
        self.screen.read(|s| s.uid.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.screen.read(|s| s.uid.is_some())
    }

    /// Restore the user remembered from the previous run, if any.
    pub async fn start(&self) -> Result<(), ScreenError> {
        let previous = match self.prefs.read_value(PREVIOUS_AUTH_USER).await {
            Ok(previous) => previous,
            Err(e) => {
                tracing::warn!("Could not read previous user: {}", e);
                None
            }
        };
        match previous.filter(|username| !username.is_empty()) {
            Some(username) => {
                self.on_trigger_event(SessionEvent::CheckPreviousAuthUser(username))
                    .await
            }
            None => {
                self.finish_check();
                Ok(())
            }
        }
    }

    pub async fn on_trigger_event(&self, event: SessionEvent) -> Result<(), ScreenError> {
        match event {
            SessionEvent::Login(account) => {
                tracing::info!("Signed in as {}", account.username);
                self.screen.update(|s| s.uid = Some(account.id));
            }
            SessionEvent::Logout => {
                if !self.is_logged_in() {
                    tracing::warn!("Logout requested with no session");
                    return Err(ScreenError::NotLoggedIn);
                }
                let last = self.screen.follow(self.logout.execute(), |_, _| {}).await;
                if last.into_data().is_some() {
                    self.screen.update(|s| {
                        s.uid = None;
                        s.did_check_for_previous_auth_user = true;
                    });
                }
            }
            SessionEvent::CheckPreviousAuthUser(username) => {
                let stream = self.check_previous_auth_user.execute(username);
                let last = self.screen.follow(stream, |_, _| {}).await;
                if let Some(account) = last.into_data() {
                    self.screen.update(|s| s.uid = Some(account.id));
                }
                self.finish_check();
            }
            SessionEvent::OnRemoveHeadFromQueue => self.screen.remove_head_from_queue(),
        }
        Ok(())
    }

    fn finish_check(&self) {
        self.screen
            .update(|s| s.did_check_for_previous_auth_user = true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryKeyValueStore, MockResponse};
    use crate::interactors::test_support::{setup, url};
    use crate::models::fixtures::account;

    fn manager(
        prefs: InMemoryKeyValueStore,
    ) -> (
        std::sync::Arc<crate::adapters::mock::MockHttpClient>,
        Arc<crate::cache::Store>,
        Arc<InMemoryKeyValueStore>,
        SessionManager,
    ) {
        let (http, api, store) = setup();
        let prefs = Arc::new(prefs);
        let session = SessionManager::new(
            CheckPreviousAuthUser::new(store.clone()),
            Logout::new(api, store.clone(), prefs.clone()),
            prefs.clone(),
        );
        (http, store, prefs, session)
    }

    #[tokio::test]
    async fn test_start_without_previous_user() {
        let (_http, _store, _prefs, session) = manager(InMemoryKeyValueStore::new());
        session.start().await.unwrap();

        let state = session.state();
        assert!(state.did_check_for_previous_auth_user);
        assert!(state.uid.is_none());
        assert!(state.queue.is_empty());
    }

    #[tokio::test]
    async fn test_start_restores_cached_account() {
        let (_http, store, _prefs, session) =
            manager(InMemoryKeyValueStore::with_value(PREVIOUS_AUTH_USER, "alice"));
        store.upsert_account(&account("a1", "alice")).unwrap();

        session.start().await.unwrap();

        assert_eq!(session.uid().as_deref(), Some("a1"));
        assert!(session.state().did_check_for_previous_auth_user);
    }

    #[tokio::test]
    async fn test_unknown_previous_user_is_silent() {
        let (_http, _store, _prefs, session) =
            manager(InMemoryKeyValueStore::with_value(PREVIOUS_AUTH_USER, "ghost"));

        session.start().await.unwrap();

        let state = session.state();
        assert!(state.uid.is_none());
        assert!(state.did_check_for_previous_auth_user);
        assert!(state.queue.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (http, store, prefs, session) = manager(InMemoryKeyValueStore::new());
        http.set_method_response("POST", &url("accounts/logout"), MockResponse::json(200, &true));
        store.upsert_account(&account("a1", "alice")).unwrap();
        session
            .on_trigger_event(SessionEvent::Login(account("a1", "alice")))
            .await
            .unwrap();
        assert!(session.is_logged_in());

        session.on_trigger_event(SessionEvent::Logout).await.unwrap();

        assert!(!session.is_logged_in());
        assert!(store.get_account("a1").unwrap().is_none());
        assert!(prefs.get(PREVIOUS_AUTH_USER).is_none());
        assert!(session.state().queue.is_empty());
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let (_http, _store, _prefs, session) = manager(InMemoryKeyValueStore::new());
        assert_eq!(
            session.on_trigger_event(SessionEvent::Logout).await,
            Err(ScreenError::NotLoggedIn)
        );
    }
}
