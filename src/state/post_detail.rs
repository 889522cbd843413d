//! One post, opened from a list.

use super::posts::{apply_refresh, PostActions, PostListState};
use super::screen::{Input, Screen, ScreenState};
use crate::domain::{MessageQueue, NetworkStatus};
use crate::error::ScreenError;
use crate::interactors::GetPost;
use crate::models::Post;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDetailState {
    pub is_loading: bool,
    pub post: Option<Post>,
    /// Set once the UI has shown the loaded post
    pub on_load: bool,
    /// The post was deleted here or elsewhere; the UI should leave
    pub deleted: bool,
    pub queue: MessageQueue,
}

impl ScreenState for PostDetailState {
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

impl PostListState for PostDetailState {
    fn posts(&self) -> &[Post] {
        self.post.as_slice()
    }
    fn posts_mut(&mut self) -> &mut [Post] {
        self.post.as_mut_slice()
    }
    fn remove_post(&mut self, id: &str) -> bool {
        if self.post.as_ref().is_some_and(|p| p.id == id) {
            self.post = None;
            self.deleted = true;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostDetailEvent {
    /// Load the post unless one is already shown
    GetPost(String),
    ToggleLike(String),
    ToggleRetweet(String),
    ToggleFollow(String),
    DeletePost(String),
    ConfirmDelete(String),
    CancelConfirmation,
    OnToggleOnLoad,
    OnRemoveHeadFromQueue,
}

pub struct PostDetailViewModel {
    screen: Screen<PostDetailState, PostDetailEvent>,
    get_post: GetPost,
    actions: PostActions,
    network: NetworkStatus,
}

impl PostDetailViewModel {
    pub fn new(get_post: GetPost, actions: PostActions, network: NetworkStatus) -> Self {
        let screen = Screen::new(PostDetailState::default()).with_refresh(actions.bus());
        Self {
            screen,
            get_post,
            actions,
            network,
        }
    }

    pub fn screen(&self) -> &Screen<PostDetailState, PostDetailEvent> {
        &self.screen
    }

    pub fn state(&self) -> PostDetailState {
        self.screen.snapshot()
    }

    pub async fn on_trigger_event(&self, event: PostDetailEvent) -> Result<(), ScreenError> {
        let result = self.handle(event).await;
        if let Err(err) = &result {
            tracing::warn!("Post detail event ignored: {}", err);
        }
        result
    }

    async fn handle(&self, event: PostDetailEvent) -> Result<(), ScreenError> {
        match event {
            PostDetailEvent::GetPost(id) => {
                if self.screen.read(|s| s.post.is_some()) {
                    return Ok(());
                }
                let stream = self.get_post.execute(id, self.network.is_available());
                self.screen.follow(stream, |s, post| s.post = Some(post)).await;
                Ok(())
            }
            PostDetailEvent::ToggleLike(id) => self.actions.toggle_like(&self.screen, &id).await,
            PostDetailEvent::ToggleRetweet(id) => {
                self.actions.toggle_retweet(&self.screen, &id).await
            }
            PostDetailEvent::ToggleFollow(username) => {
                if self.screen.read(|s| s.post.is_none()) {
                    return Err(ScreenError::MissingPost);
                }
                self.actions
                    .toggle_follow(&self.screen, &username)
                    .await
                    .map(|_| ())
            }
            PostDetailEvent::DeletePost(id) => self.actions.confirm_delete(
                &self.screen,
                &id,
                PostDetailEvent::ConfirmDelete(id.clone()),
                PostDetailEvent::CancelConfirmation,
            ),
            PostDetailEvent::ConfirmDelete(id) => {
                self.actions.delete(&self.screen, &id).await.map(|_| ())
            }
            PostDetailEvent::CancelConfirmation => {
                self.screen.clear_queue();
                Ok(())
            }
            PostDetailEvent::OnToggleOnLoad => {
                self.screen.update(|s| s.on_load = true);
                Ok(())
            }
            PostDetailEvent::OnRemoveHeadFromQueue => {
                self.screen.remove_head_from_queue();
                Ok(())
            }
        }
    }

    async fn dispatch(&self, input: Input<PostDetailEvent>) {
        match input {
            Input::Event(event) => {
                let _ = self.on_trigger_event(event).await;
            }
            Input::Refresh(event) => self.screen.update(|s| {
                apply_refresh(s, &event);
            }),
        }
    }

    pub async fn process_pending(&self) -> usize {
        let inputs = self.screen.pending_inputs();
        let count = inputs.len();
        for input in inputs {
            self.dispatch(input).await;
        }
        count
    }

    pub async fn run(&self) {
        while let Some(input) = self.screen.next_input().await {
            self.dispatch(input).await;
        }
    }
}
