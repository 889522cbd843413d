//! Compose screen.

use super::refresh::{RefreshBus, RefreshEvent};
use super::screen::{Screen, ScreenState};
use crate::api::MediaUpload;
use crate::domain::validation::validate_post_text;
use crate::domain::{MessageQueue, StateMessage};
use crate::error::{messages, ScreenError};
use crate::interactors::{CreatePost, GetAccountFromCache};
use crate::models::Account;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatePostState {
    pub is_loading: bool,
    pub text: String,
    pub file: Option<MediaUpload>,
    /// Author shown next to the editor
    pub account: Option<Account>,
    pub on_publish_success: bool,
    pub queue: MessageQueue,
}

impl ScreenState for CreatePostState {
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
pub enum CreatePostEvent {
    /// Load the signed-in account, by id
    LoadAccount(String),
    OnUpdateText(String),
    OnUpdateFile(Option<MediaUpload>),
    PublishPost,
    OnMessageReceived(StateMessage),
    OnRemoveHeadFromQueue,
}

pub struct CreatePostViewModel {
    screen: Screen<CreatePostState, CreatePostEvent>,
    create_post: CreatePost,
    get_account: GetAccountFromCache,
    bus: RefreshBus,
}

impl CreatePostViewModel {
    pub fn new(create_post: CreatePost, get_account: GetAccountFromCache, bus: RefreshBus) -> Self {
        Self {
            screen: Screen::new(CreatePostState::default()),
            create_post,
            get_account,
            bus,
        }
    }

    pub fn screen(&self) -> &Screen<CreatePostState, CreatePostEvent> {
        &self.screen
    }

    pub fn state(&self) -> CreatePostState {
        self.screen.snapshot()
    }

    pub async fn on_trigger_event(&self, event: CreatePostEvent) -> Result<(), ScreenError> {
        let result = self.handle(event).await;
        if let Err(err) = &result {
            tracing::warn!("Create post event ignored: {}", err);
        }
        result
    }

    async fn handle(&self, event: CreatePostEvent) -> Result<(), ScreenError> {
        match event {
            CreatePostEvent::LoadAccount(id) => {
                let stream = self.get_account.execute(id);
                self.screen
                    .follow(stream, |s, account| s.account = Some(account))
                    .await;
                Ok(())
            }
            CreatePostEvent::OnUpdateText(text) => {
                self.screen.update(|s| s.text = text);
                Ok(())
            }
            CreatePostEvent::OnUpdateFile(file) => {
                self.screen.update(|s| s.file = file);
                Ok(())
            }
            CreatePostEvent::PublishPost => self.publish().await,
            CreatePostEvent::OnMessageReceived(message) => {
                self.screen.push_message(message);
                Ok(())
            }
            CreatePostEvent::OnRemoveHeadFromQueue => {
                self.screen.remove_head_from_queue();
                Ok(())
            }
        }
    }

    async fn publish(&self) -> Result<(), ScreenError> {
        let (text, file) = self.screen.read(|s| (s.text.clone(), s.file.clone()));
        if text.trim().is_empty() && file.is_none() {
            self.screen
                .push_message(StateMessage::error_dialog(messages::ERROR_MUST_SELECT_IMAGE));
            return Err(ScreenError::Validation(messages::ERROR_MUST_SELECT_IMAGE.into()));
        }
        if let Err(message) = validate_post_text(&text) {
            self.screen.push_message(StateMessage::error_dialog(message.clone()));
            return Err(ScreenError::Validation(message));
        }

        let text = Some(text).filter(|t| !t.trim().is_empty());
        let last = self
            .screen
            .follow(self.create_post.execute(text, file), |s, _| {
                s.on_publish_success = true;
            })
            .await;
        if let Some(post) = last.into_data() {
            tracing::info!("Published post {}", post.id);
            self.bus.publish(RefreshEvent::PostAdded(post));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::api::test_support::post_json;
    use crate::domain::UiComponentType;
    use crate::interactors::test_support::{setup, url};
    use crate::models::fixtures::account;

    fn view_model() -> (
        std::sync::Arc<crate::adapters::mock::MockHttpClient>,
        std::sync::Arc<crate::cache::Store>,
        RefreshBus,
        CreatePostViewModel,
    ) {
        let (http, api, store) = setup();
        let bus = RefreshBus::new();
        let vm = CreatePostViewModel::new(
            CreatePost::new(api, store.clone()),
            GetAccountFromCache::new(store.clone()),
            bus.clone(),
        );
        (http, store, bus, vm)
    }

    #[tokio::test]
    async fn test_empty_post_rejected_locally() {
        let (http, _store, _bus, vm) = view_model();
        vm.on_trigger_event(CreatePostEvent::OnUpdateText("   ".into()))
            .await
            .unwrap();

        let result = vm.on_trigger_event(CreatePostEvent::PublishPost).await;

        assert!(matches!(result, Err(ScreenError::Validation(_))));
        let state = vm.state();
        assert_eq!(state.queue.peek().unwrap().message, messages::ERROR_MUST_SELECT_IMAGE);
        assert!(!state.on_publish_success);
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_too_long_rejected() {
        let (_http, _store, _bus, vm) = view_model();
        vm.on_trigger_event(CreatePostEvent::OnUpdateText("x".repeat(281)))
            .await
            .unwrap();
        assert!(vm.on_trigger_event(CreatePostEvent::PublishPost).await.is_err());
        assert_eq!(vm.state().queue.len(), 1);
    }

    #[tokio::test]
    async fn test_publish_announces_new_post() {
        let (http, _store, bus, vm) = view_model();
        let mut rx = bus.subscribe();
        http.set_method_response(
            "POST",
            &url("posts"),
            MockResponse::json(200, &post_json("p1", "u1", "2021-01-01T00:00:00Z")),
        );

        vm.on_trigger_event(CreatePostEvent::OnUpdateFile(Some(MediaUpload::new(
            "cat.jpg",
            "image/jpg",
            Bytes::from_static(b"jpg"),
        ))))
        .await
        .unwrap();
        vm.on_trigger_event(CreatePostEvent::PublishPost).await.unwrap();

        let state = vm.state();
        assert!(state.on_publish_success);
        assert_eq!(state.queue.peek().unwrap().ui_component_type, UiComponentType::Snackbar);
        match rx.try_recv().unwrap() {
            RefreshEvent::PostAdded(post) => assert_eq!(post.id, "p1"),
            other => panic!("unexpected event: {:?}", other),
        }
        let form = http.requests_with_method("POST")[0].form.clone().unwrap();
        assert!(form.has_part("file"));
        assert!(!form.has_part("text"));
    }

    #[tokio::test]
    async fn test_load_account_from_cache() {
        let (_http, store, _bus, vm) = view_model();
        store.upsert_account(&account("a1", "alice")).unwrap();

        vm.on_trigger_event(CreatePostEvent::LoadAccount("a1".into()))
            .await
            .unwrap();

        assert_eq!(vm.state().account.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_silent_message_not_queued() {
        let (_http, _store, _bus, vm) = view_model();
        vm.on_trigger_event(CreatePostEvent::OnMessageReceived(StateMessage::silent_success(
            "quiet",
        )))
        .await
        .unwrap();
        assert!(vm.state().queue.is_empty());
    }
}
