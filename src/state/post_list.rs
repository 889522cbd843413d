//! Home feed.

use super::posts::{apply_refresh, remove_from, PostActions, PostListState};
use super::refresh::RefreshEvent;
use super::screen::{Input, Screen, ScreenState};
use crate::domain::{MessageQueue, NetworkStatus, PAGE_SIZE};
use crate::error::ScreenError;
use crate::interactors::{GetFeed, RestorePosts};
use crate::models::Post;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub is_loading: bool,
    /// Pages loaded so far, 1-based
    pub page: u32,
    pub posts: Vec<Post>,
    /// Posts removed since the last full load; shifts the next-page threshold
    pub deleted_count: u32,
    pub scroll_position: u32,
    pub queue: MessageQueue,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            is_loading: false,
            page: 1,
            posts: Vec::new(),
            deleted_count: 0,
            scroll_position: 0,
            queue: MessageQueue::new(),
        }
    }
}

impl ScreenState for FeedState {
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

impl PostListState for FeedState {
    fn posts(&self) -> &[Post] {
        &self.posts
    }
    fn posts_mut(&mut self) -> &mut [Post] {
        &mut self.posts
    }
    fn remove_post(&mut self, id: &str) -> bool {
        let removed = remove_from(&mut self.posts, id);
        if removed {
            self.deleted_count += 1;
        }
        removed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Reload from page 1
    Feed,
    NextPage,
    /// Rebuild the list from the cache after a restart
    Restore,
    UpdateList(Post),
    AddPost(Post),
    ToggleLike(String),
    ToggleRetweet(String),
    ToggleFollow(String),
    /// Ask to delete a post
    DeletePost(String),
    ConfirmDelete(String),
    CancelConfirmation,
    RemoveItem(String),
    ChangeScrollPosition(u32),
    OnRemoveHeadFromQueue,
}

pub struct PostListViewModel {
    screen: Screen<FeedState, FeedEvent>,
    get_feed: GetFeed,
    restore_posts: RestorePosts,
    actions: PostActions,
    network: NetworkStatus,
}

impl PostListViewModel {
    pub fn new(
        get_feed: GetFeed,
        restore_posts: RestorePosts,
        actions: PostActions,
        network: NetworkStatus,
    ) -> Self {
        let screen = Screen::new(FeedState::default()).with_refresh(actions.bus());
        Self {
            screen,
            get_feed,
            restore_posts,
            actions,
            network,
        }
    }

    /// Resume at a saved page and scroll position.
    pub fn with_saved_position(self, page: u32, scroll_position: u32) -> Self {
        self.screen.update(|s| {
            s.page = page.max(1);
            s.scroll_position = scroll_position;
        });
        self
    }

    pub fn screen(&self) -> &Screen<FeedState, FeedEvent> {
        &self.screen
    }

    pub fn state(&self) -> FeedState {
        self.screen.snapshot()
    }

    /// First event after construction: restore if the user had scrolled,
    /// otherwise load the feed.
    pub async fn start(&self) -> Result<(), ScreenError> {
        let event = if self.screen.read(|s| s.scroll_position) != 0 {
            FeedEvent::Restore
        } else {
            FeedEvent::Feed
        };
        self.on_trigger_event(event).await
    }

    pub async fn on_trigger_event(&self, event: FeedEvent) -> Result<(), ScreenError> {
        let result = self.handle(event).await;
        if let Err(err) = &result {
            tracing::warn!("Feed event ignored: {}", err);
        }
        result
    }

    async fn handle(&self, event: FeedEvent) -> Result<(), ScreenError> {
        match event {
            FeedEvent::Feed => self.feed().await,
            FeedEvent::NextPage => self.next_page().await,
            FeedEvent::Restore => self.restore().await,
            FeedEvent::UpdateList(post) => {
                self.screen.update(|s| {
                    apply_refresh(s, &RefreshEvent::PostUpdated(post));
                });
                Ok(())
            }
            FeedEvent::AddPost(post) => {
                self.add_post(post);
                Ok(())
            }
            FeedEvent::ToggleLike(id) => self.actions.toggle_like(&self.screen, &id).await,
            FeedEvent::ToggleRetweet(id) => self.actions.toggle_retweet(&self.screen, &id).await,
            FeedEvent::ToggleFollow(username) => self
                .actions
                .toggle_follow(&self.screen, &username)
                .await
                .map(|_| ()),
            FeedEvent::DeletePost(id) => self.actions.confirm_delete(
                &self.screen,
                &id,
                FeedEvent::ConfirmDelete(id.clone()),
                FeedEvent::CancelConfirmation,
            ),
            FeedEvent::ConfirmDelete(id) => self.actions.delete(&self.screen, &id).await.map(|_| ()),
            FeedEvent::CancelConfirmation => {
                self.screen.clear_queue();
                Ok(())
            }
            FeedEvent::RemoveItem(id) => {
                self.screen.update(|s| {
                    apply_refresh(s, &RefreshEvent::PostRemoved(id));
                });
                Ok(())
            }
            FeedEvent::ChangeScrollPosition(position) => {
                self.screen.update(|s| s.scroll_position = position);
                Ok(())
            }
            FeedEvent::OnRemoveHeadFromQueue => {
                self.screen.remove_head_from_queue();
                Ok(())
            }
        }
    }

    async fn feed(&self) -> Result<(), ScreenError> {
        self.screen.update(|s| {
            s.posts.clear();
            s.page = 1;
            s.deleted_count = 0;
            s.scroll_position = 0;
        });
        let stream = self.get_feed.execute(1, None, self.network.is_available());
        self.screen
            .follow(stream, |s, posts| {
                s.posts = posts;
                s.deleted_count = 0;
            })
            .await;
        Ok(())
    }

    async fn restore(&self) -> Result<(), ScreenError> {
        let page = self.screen.read(|s| s.page);
        let stream = self.restore_posts.execute(page);
        self.screen
            .follow(stream, |s, posts| {
                s.posts = posts;
                s.deleted_count = 0;
            })
            .await;
        Ok(())
    }

    /// Load the next page once the user has scrolled to the end of the
    /// loaded rows.
    async fn next_page(&self) -> Result<(), ScreenError> {
        let (position, page, deleted, cursor) = self.screen.read(|s| {
            (
                s.scroll_position,
                s.page,
                s.deleted_count,
                s.posts.last().map(|p| p.created_at.clone()),
            )
        });
        let threshold = i64::from(page) * i64::from(PAGE_SIZE) - i64::from(deleted);
        if i64::from(position) + 1 < threshold {
            return Ok(());
        }
        let Some(cursor) = cursor else {
            tracing::debug!("Next page requested on an empty feed");
            return Ok(());
        };
        let next = page.saturating_add(1);
        self.screen.update(|s| s.page = next);
        tracing::debug!("Loading feed page {} before {}", next, cursor);

        let stream = self
            .get_feed
            .execute(next, Some(cursor), self.network.is_available());
        self.screen
            .follow(stream, |s, posts| s.posts.extend(posts))
            .await;
        Ok(())
    }

    fn add_post(&self, post: Post) {
        self.screen.update(|s| {
            if !s.posts.iter().any(|p| p.id == post.id) {
                s.posts.insert(0, post);
            }
        });
    }

    fn on_refresh(&self, event: RefreshEvent) {
        match event {
            RefreshEvent::PostAdded(post) => self.add_post(post),
            other => self.screen.update(|s| {
                apply_refresh(s, &other);
            }),
        }
    }

    async fn dispatch(&self, input: Input<FeedEvent>) {
        match input {
            Input::Event(event) => {
                let _ = self.on_trigger_event(event).await;
            }
            Input::Refresh(event) => self.on_refresh(event),
        }
    }

    /// Handle everything queued by callbacks or other screens. Returns how
    /// many inputs were handled; zero while [`Self::run`] is serving them.
    pub async fn process_pending(&self) -> usize {
        let inputs = self.screen.pending_inputs();
        let count = inputs.len();
        for input in inputs {
            self.dispatch(input).await;
        }
        count
    }

    /// Serve inputs until the task is dropped.
    pub async fn run(&self) {
        while let Some(input) = self.screen.next_input().await {
            self.dispatch(input).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::api::test_support::{page_json, post_json};
    use crate::domain::{MessageType, UiComponentType};
    use crate::error::messages;
    use crate::interactors::test_support::{setup, url};
    use crate::state::posts::test_support::actions;
    use crate::state::RefreshBus;

    fn view_model() -> (
        std::sync::Arc<crate::adapters::mock::MockHttpClient>,
        std::sync::Arc<crate::cache::Store>,
        RefreshBus,
        PostListViewModel,
    ) {
        let (http, api, store) = setup();
        let bus = RefreshBus::new();
        let vm = PostListViewModel::new(
            GetFeed::new(api.clone(), store.clone()),
            RestorePosts::new(store.clone()),
            actions(&api, &store, &bus),
            NetworkStatus::new(true),
        );
        (http, store, bus, vm)
    }

    fn feed_page(ids: std::ops::Range<u32>) -> serde_json::Value {
        let posts = ids
            .map(|i| post_json(&format!("p{:02}", i), "u1", &format!("2021-01-{:02}T00:00:00Z", 28 - i)))
            .collect();
        page_json(posts, true)
    }

    #[tokio::test]
    async fn test_feed_loads_first_page() {
        let (http, _store, _bus, vm) = view_model();
        http.set_response(&url("posts/feed"), MockResponse::json(200, &feed_page(0..3)));

        vm.start().await.unwrap();

        let state = vm.state();
        assert!(!state.is_loading);
        assert_eq!(state.page, 1);
        assert_eq!(state.posts.len(), 3);
        assert_eq!(state.posts[0].id, "p00");
        assert!(state.queue.is_empty());
    }

    #[tokio::test]
    async fn test_next_page_waits_for_scroll() {
        let (http, _store, _bus, vm) = view_model();
        http.set_response(&url("posts/feed"), MockResponse::json(200, &feed_page(0..20)));
        vm.on_trigger_event(FeedEvent::Feed).await.unwrap();

        vm.on_trigger_event(FeedEvent::ChangeScrollPosition(5)).await.unwrap();
        vm.on_trigger_event(FeedEvent::NextPage).await.unwrap();
        assert_eq!(vm.state().page, 1);

        let cursor_url = url(&format!(
            "posts/feed?cursor={}",
            urlencoding::encode("2021-01-09T00:00:00Z")
        ));
        http.set_response(&cursor_url, MockResponse::json(200, &page_json(vec![], false)));
        vm.on_trigger_event(FeedEvent::ChangeScrollPosition(19)).await.unwrap();
        vm.on_trigger_event(FeedEvent::NextPage).await.unwrap();

        let state = vm.state();
        assert_eq!(state.page, 2);
        assert_eq!(state.posts.len(), 20);
        assert!(http.get_requests().iter().any(|r| r.url == cursor_url));
    }

    #[tokio::test]
    async fn test_next_page_from_large_saved_page() {
        let (http, _store, _bus, vm) = view_model();
        let vm = vm.with_saved_position(u32::MAX, 3);

        vm.on_trigger_event(FeedEvent::NextPage).await.unwrap();

        assert_eq!(vm.state().page, u32::MAX);
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_confirm_then_proceed() {
        let (http, store, bus, vm) = view_model();
        let mut rx = bus.subscribe();
        http.set_response(&url("posts/feed"), MockResponse::json(200, &feed_page(0..2)));
        vm.on_trigger_event(FeedEvent::Feed).await.unwrap();
        http.set_method_response(
            "DELETE",
            &url("posts/p00"),
            MockResponse::json(200, &post_json("p00", "u1", "2021-01-28T00:00:00Z")),
        );

        vm.on_trigger_event(FeedEvent::DeletePost("p00".into())).await.unwrap();
        let dialog = vm.state().queue.peek().cloned().unwrap();
        assert_eq!(dialog.message, messages::CONFIRM_DELETE_POST);
        assert_eq!(dialog.message_type, MessageType::Info);
        assert!(matches!(dialog.ui_component_type, UiComponentType::AreYouSureDialog(_)));
        assert_eq!(vm.state().posts.len(), 2);

        dialog.callback().unwrap().proceed();
        vm.on_trigger_event(FeedEvent::OnRemoveHeadFromQueue).await.unwrap();
        assert_eq!(vm.process_pending().await, 1);

        let state = vm.state();
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.deleted_count, 1);
        assert!(store.get_post_by_id("p00").unwrap().is_none());
        assert_eq!(rx.try_recv().unwrap(), RefreshEvent::PostRemoved("p00".into()));
    }

    #[tokio::test]
    async fn test_delete_cancel_clears_queue() {
        let (http, _store, _bus, vm) = view_model();
        http.set_response(&url("posts/feed"), MockResponse::json(200, &feed_page(0..2)));
        vm.on_trigger_event(FeedEvent::Feed).await.unwrap();

        vm.on_trigger_event(FeedEvent::DeletePost("p01".into())).await.unwrap();
        let dialog = vm.state().queue.peek().cloned().unwrap();
        dialog.callback().unwrap().cancel();
        vm.process_pending().await;

        let state = vm.state();
        assert!(state.queue.is_empty());
        assert_eq!(state.posts.len(), 2);
        assert!(http.requests_with_method("DELETE").is_empty());
    }

    #[tokio::test]
    async fn test_process_pending_alongside_run() {
        let (http, _store, _bus, vm) = view_model();
        http.set_response(&url("posts/feed"), MockResponse::json(200, &feed_page(0..2)));
        vm.on_trigger_event(FeedEvent::Feed).await.unwrap();

        let vm = std::sync::Arc::new(vm);
        let runner = tokio::spawn({
            let vm = vm.clone();
            async move { vm.run().await }
        });
        tokio::task::yield_now().await;

        vm.on_trigger_event(FeedEvent::DeletePost("p01".into())).await.unwrap();
        let dialog = vm.state().queue.peek().cloned().unwrap();
        dialog.callback().unwrap().cancel();

        let handled = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            vm.process_pending(),
        )
        .await
        .expect("process_pending blocked behind run");
        assert_eq!(handled, 0);

        for _ in 0..100 {
            if vm.state().queue.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(vm.state().queue.is_empty());
        runner.abort();
    }

    #[tokio::test]
    async fn test_unknown_post_is_an_error() {
        let (_http, _store, _bus, vm) = view_model();
        assert_eq!(
            vm.on_trigger_event(FeedEvent::ToggleLike("nope".into())).await,
            Err(ScreenError::UnknownPost("nope".into()))
        );
    }

    #[tokio::test]
    async fn test_toggle_like_updates_list_and_announces() {
        let (http, _store, bus, vm) = view_model();
        let mut rx = bus.subscribe();
        http.set_response(&url("posts/feed"), MockResponse::json(200, &feed_page(0..1)));
        vm.on_trigger_event(FeedEvent::Feed).await.unwrap();
        http.set_method_response(
            "POST",
            &url("posts/p00/like"),
            MockResponse::json(200, &{
                let mut liked = post_json("p00", "u1", "2021-01-28T00:00:00Z");
                liked["liked"] = true.into();
                liked["likes"] = 3.into();
                liked
            }),
        );

        vm.on_trigger_event(FeedEvent::ToggleLike("p00".into())).await.unwrap();

        let post = vm.state().posts[0].clone();
        assert!(post.liked);
        assert_eq!(post.likes, 3);
        assert_eq!(rx.try_recv().unwrap(), RefreshEvent::PostUpdated(post));
    }

    #[tokio::test]
    async fn test_refresh_from_other_screens() {
        let (http, _store, bus, vm) = view_model();
        http.set_response(&url("posts/feed"), MockResponse::json(200, &feed_page(0..2)));
        vm.on_trigger_event(FeedEvent::Feed).await.unwrap();

        let fresh = crate::models::fixtures::post("new", "u1", "2021-02-01T00:00:00Z");
        bus.publish(RefreshEvent::PostAdded(fresh));
        bus.publish(RefreshEvent::PostRemoved("p01".into()));
        assert_eq!(vm.process_pending().await, 2);

        let ids: Vec<String> = vm.state().posts.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["new", "p00"]);
        assert_eq!(vm.state().deleted_count, 1);
    }

    #[tokio::test]
    async fn test_remove_head_from_empty_queue_is_noop() {
        let (_http, _store, _bus, vm) = view_model();
        vm.on_trigger_event(FeedEvent::OnRemoveHeadFromQueue).await.unwrap();
        assert!(vm.state().queue.is_empty());
    }
}
