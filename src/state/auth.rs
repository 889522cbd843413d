//! Login and registration forms.
//!
//! Both validate locally first; invalid input is reported as a dialog and
//! never reaches the server. A successful sign-in is handed to the
//! [`SessionManager`].

use std::sync::Arc;

use super::screen::{Screen, ScreenState};
use super::session::{SessionEvent, SessionManager};
use crate::api::RegisterRequest;
use crate::domain::validation::{
    first_error, validate_display_name, validate_email, validate_password, validate_username,
};
use crate::domain::{MessageQueue, StateMessage};
use crate::error::ScreenError;
use crate::interactors::{Login, Register};
use crate::models::Account;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    pub is_loading: bool,
    pub email: String,
    pub password: String,
    pub queue: MessageQueue,
}

impl ScreenState for LoginState {
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
pub enum LoginEvent {
    OnUpdateEmail(String),
    OnUpdatePassword(String),
    Login,
    OnRemoveHeadFromQueue,
}

/// Report the first invalid field, if any.
fn reject<S: ScreenState, E: Send + 'static>(
    screen: &Screen<S, E>,
    checked: Result<(), String>,
) -> Result<(), ScreenError> {
    checked.map_err(|message| {
        screen.push_message(StateMessage::error_dialog(message.clone()));
        ScreenError::Validation(message)
    })
}

async fn sign_in(session: &SessionManager, account: Option<Account>) -> Result<(), ScreenError> {
    match account {
        Some(account) => session.on_trigger_event(SessionEvent::Login(account)).await,
        None => Ok(()),
    }
}

pub struct LoginViewModel {
    screen: Screen<LoginState, LoginEvent>,
    login: Login,
    session: Arc<SessionManager>,
}

impl LoginViewModel {
    pub fn new(login: Login, session: Arc<SessionManager>) -> Self {
        Self {
            screen: Screen::new(LoginState::default()),
            login,
            session,
        }
    }

    pub fn screen(&self) -> &Screen<LoginState, LoginEvent> {
        &self.screen
    }

    pub fn state(&self) -> LoginState {
        self.screen.snapshot()
    }

    pub async fn on_trigger_event(&self, event: LoginEvent) -> Result<(), ScreenError> {
        match event {
            LoginEvent::OnUpdateEmail(email) => self.screen.update(|s| s.email = email),
            LoginEvent::OnUpdatePassword(password) => self.screen.update(|s| s.password = password),
            LoginEvent::Login => {
                let (email, password) = self
                    .screen
                    .read(|s| (s.email.trim().to_string(), s.password.clone()));
                reject(
                    &self.screen,
                    first_error([validate_email(&email), validate_password(&password)]),
                )?;
                let last = self
                    .screen
                    .follow(self.login.execute(email, password), |_, _| {})
                    .await;
                sign_in(&self.session, last.into_data()).await?;
            }
            LoginEvent::OnRemoveHeadFromQueue => self.screen.remove_head_from_queue(),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterState {
    pub is_loading: bool,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub queue: MessageQueue,
}

impl ScreenState for RegisterState {
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
pub enum RegisterEvent {
    OnUpdateEmail(String),
    OnUpdateUsername(String),
    OnUpdateDisplayName(String),
    OnUpdatePassword(String),
    RegisterClicked,
    OnRemoveHeadFromQueue,
}

pub struct RegisterViewModel {
    screen: Screen<RegisterState, RegisterEvent>,
    register: Register,
    session: Arc<SessionManager>,
}

impl RegisterViewModel {
    pub fn new(register: Register, session: Arc<SessionManager>) -> Self {
        Self {
            screen: Screen::new(RegisterState::default()),
            register,
            session,
        }
    }

    pub fn screen(&self) -> &Screen<RegisterState, RegisterEvent> {
        &self.screen
    }

    pub fn state(&self) -> RegisterState {
        self.screen.snapshot()
    }

    pub async fn on_trigger_event(&self, event: RegisterEvent) -> Result<(), ScreenError> {
        match event {
            RegisterEvent::OnUpdateEmail(v) => self.screen.update(|s| s.email = v),
            RegisterEvent::OnUpdateUsername(v) => self.screen.update(|s| s.username = v),
            RegisterEvent::OnUpdateDisplayName(v) => self.screen.update(|s| s.display_name = v),
            RegisterEvent::OnUpdatePassword(v) => self.screen.update(|s| s.password = v),
            RegisterEvent::RegisterClicked => {
                let request = self.screen.read(|s| RegisterRequest {
                    email: s.email.trim().to_string(),
                    username: s.username.trim().to_string(),
                    display_name: s.display_name.trim().to_string(),
                    password: s.password.clone(),
                });
                reject(
                    &self.screen,
                    first_error([
                        validate_email(&request.email),
                        validate_username(&request.username),
                        validate_display_name(&request.display_name),
                        validate_password(&request.password),
                    ]),
                )?;
                let last = self
                    .screen
                    .follow(self.register.execute(request), |_, _| {})
                    .await;
                sign_in(&self.session, last.into_data()).await?;
            }
            RegisterEvent::OnRemoveHeadFromQueue => self.screen.remove_head_from_queue(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryKeyValueStore, MockHttpClient, MockResponse};
    use crate::api::test_support::account_json;
    use crate::error::messages;
    use crate::interactors::test_support::{setup, url};
    use crate::interactors::{CheckPreviousAuthUser, Logout};
    use crate::traits::PREVIOUS_AUTH_USER;

    struct Fixture {
        http: Arc<MockHttpClient>,
        prefs: Arc<InMemoryKeyValueStore>,
        session: Arc<SessionManager>,
        login: LoginViewModel,
        register: RegisterViewModel,
    }

    fn fixture() -> Fixture {
        let (http, api, store) = setup();
        let prefs = Arc::new(InMemoryKeyValueStore::new());
        let session = Arc::new(SessionManager::new(
            CheckPreviousAuthUser::new(store.clone()),
            Logout::new(api.clone(), store.clone(), prefs.clone()),
            prefs.clone(),
        ));
        let login = LoginViewModel::new(
            Login::new(api.clone(), store.clone(), prefs.clone()),
            session.clone(),
        );
        let register = RegisterViewModel::new(
            Register::new(api, store, prefs.clone()),
            session.clone(),
        );
        Fixture {
            http,
            prefs,
            session,
            login,
            register,
        }
    }

    #[tokio::test]
    async fn test_login_signs_in() {
        let f = fixture();
        f.http.set_method_response(
            "POST",
            &url("accounts/login"),
            MockResponse::json(200, &account_json("a1", "alice")),
        );

        f.login.on_trigger_event(LoginEvent::OnUpdateEmail(" alice@mirage.test ".into())).await.unwrap();
        f.login.on_trigger_event(LoginEvent::OnUpdatePassword("secret1".into())).await.unwrap();
        f.login.on_trigger_event(LoginEvent::Login).await.unwrap();

        assert_eq!(f.session.uid().as_deref(), Some("a1"));
        assert_eq!(f.prefs.get(PREVIOUS_AUTH_USER).as_deref(), Some("alice"));
        assert!(f.login.state().queue.is_empty());
        let body = f.http.requests_with_method("POST")[0].body.clone().unwrap();
        assert!(body.contains("\"email\":\"alice@mirage.test\""));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_email_locally() {
        let f = fixture();
        f.login.on_trigger_event(LoginEvent::OnUpdateEmail("nope".into())).await.unwrap();
        f.login.on_trigger_event(LoginEvent::OnUpdatePassword("secret1".into())).await.unwrap();

        let result = f.login.on_trigger_event(LoginEvent::Login).await;

        assert!(matches!(result, Err(ScreenError::Validation(_))));
        assert_eq!(f.login.state().queue.peek().unwrap().message, "Invalid email: nope");
        assert!(f.http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let f = fixture();
        f.http.set_method_response("POST", &url("accounts/login"), MockResponse::status(401, ""));
        f.login.on_trigger_event(LoginEvent::OnUpdateEmail("a@b.c".into())).await.unwrap();
        f.login.on_trigger_event(LoginEvent::OnUpdatePassword("secret1".into())).await.unwrap();
        f.login.on_trigger_event(LoginEvent::Login).await.unwrap();

        assert!(!f.session.is_logged_in());
        assert_eq!(
            f.login.state().queue.peek().unwrap().message,
            messages::INVALID_CREDENTIALS
        );
    }

    #[tokio::test]
    async fn test_register_validates_every_field() {
        let f = fixture();
        for event in [
            RegisterEvent::OnUpdateEmail("bob@mirage.test".into()),
            RegisterEvent::OnUpdateUsername("bob".into()),
            RegisterEvent::OnUpdateDisplayName("Bobby".into()),
            RegisterEvent::OnUpdatePassword("secret1".into()),
        ] {
            f.register.on_trigger_event(event).await.unwrap();
        }

        let result = f.register.on_trigger_event(RegisterEvent::RegisterClicked).await;

        assert!(matches!(result, Err(ScreenError::Validation(_))));
        assert!(f.http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let f = fixture();
        f.http.set_method_response(
            "POST",
            &url("accounts/register"),
            MockResponse::status(409, r#"{"error":{"message":"email already exists"}}"#),
        );
        for event in [
            RegisterEvent::OnUpdateEmail("bob@mirage.test".into()),
            RegisterEvent::OnUpdateUsername("bobby".into()),
            RegisterEvent::OnUpdateDisplayName("Bobby".into()),
            RegisterEvent::OnUpdatePassword("secret1".into()),
            RegisterEvent::RegisterClicked,
        ] {
            f.register.on_trigger_event(event).await.unwrap();
        }

        assert!(!f.session.is_logged_in());
        assert_eq!(
            f.register.state().queue.peek().unwrap().message,
            messages::ERROR_EMAIL_IN_USE
        );
    }
}
