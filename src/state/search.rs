//! Search screen. A query starting with `#` searches posts by hashtag,
//! anything else searches profiles.

use super::posts::{apply_refresh, remove_from, PostActions, PostListState};
use super::refresh::RefreshEvent;
use super::screen::{Input, Screen, ScreenState};
use crate::domain::{MessageQueue, StateMessage, PAGE_SIZE};
use crate::error::ScreenError;
use crate::interactors::{SearchPosts, SearchProfiles};
use crate::models::{Post, Profile};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub is_loading: bool,
    pub query: String,
    pub posts: Vec<Post>,
    pub profiles: Vec<Profile>,
    pub page: u32,
    pub list_position: u32,
    pub queue: MessageQueue,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            is_loading: false,
            query: String::new(),
            posts: Vec::new(),
            profiles: Vec::new(),
            page: 1,
            list_position: 0,
            queue: MessageQueue::new(),
        }
    }
}

impl SearchState {
    pub fn is_post_search(&self) -> bool {
        self.query.starts_with('#')
    }
}

impl ScreenState for SearchState {
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

impl PostListState for SearchState {
    fn posts(&self) -> &[Post] {
        &self.posts
    }
    fn posts_mut(&mut self) -> &mut [Post] {
        &mut self.posts
    }
    fn remove_post(&mut self, id: &str) -> bool {
        remove_from(&mut self.posts, id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    NewSearch,
    UpdateQuery(String),
    OnUpdateScrollPosition(u32),
    Error(StateMessage),
    NextPage,
    OnToggleFollow(String),
    ToggleLike(String),
    ToggleRetweet(String),
    DeletePost(String),
    ConfirmDelete(String),
    CancelConfirmation,
    UpdateList(Post),
    RemoveItem(String),
    OnRemoveHeadFromQueue,
}

pub struct SearchViewModel {
    screen: Screen<SearchState, SearchEvent>,
    search_posts: SearchPosts,
    search_profiles: SearchProfiles,
    actions: PostActions,
}

impl SearchViewModel {
    pub fn new(search_posts: SearchPosts, search_profiles: SearchProfiles, actions: PostActions) -> Self {
        let screen = Screen::new(SearchState::default()).with_refresh(actions.bus());
        Self {
            screen,
            search_posts,
            search_profiles,
            actions,
        }
    }

    pub fn screen(&self) -> &Screen<SearchState, SearchEvent> {
        &self.screen
    }

    pub fn state(&self) -> SearchState {
        self.screen.snapshot()
    }

    pub async fn on_trigger_event(&self, event: SearchEvent) -> Result<(), ScreenError> {
        let result = self.handle(event).await;
        if let Err(err) = &result {
            tracing::warn!("Search event ignored: {}", err);
        }
        result
    }

    async fn handle(&self, event: SearchEvent) -> Result<(), ScreenError> {
        match event {
            SearchEvent::NewSearch => self.new_search().await,
            SearchEvent::UpdateQuery(query) => {
                self.screen.update(|s| s.query = query);
                Ok(())
            }
            SearchEvent::OnUpdateScrollPosition(position) => {
                self.screen.update(|s| s.list_position = position);
                Ok(())
            }
            SearchEvent::Error(message) => {
                self.screen.push_message(message);
                Ok(())
            }
            SearchEvent::NextPage => self.next_page().await,
            SearchEvent::OnToggleFollow(username) => {
                let profile = self.actions.toggle_follow(&self.screen, &username).await?;
                if let Some(profile) = profile {
                    self.screen.update(|s| {
                        if let Some(slot) = s.profiles.iter_mut().find(|p| p.id == profile.id) {
                            *slot = profile;
                        }
                    });
                }
                Ok(())
            }
            SearchEvent::ToggleLike(id) => self.actions.toggle_like(&self.screen, &id).await,
            SearchEvent::ToggleRetweet(id) => self.actions.toggle_retweet(&self.screen, &id).await,
            SearchEvent::DeletePost(id) => self.actions.confirm_delete(
                &self.screen,
                &id,
                SearchEvent::ConfirmDelete(id.clone()),
                SearchEvent::CancelConfirmation,
            ),
            SearchEvent::ConfirmDelete(id) => self.actions.delete(&self.screen, &id).await.map(|_| ()),
            SearchEvent::CancelConfirmation => {
                self.screen.clear_queue();
                Ok(())
            }
            SearchEvent::UpdateList(post) => {
                self.screen.update(|s| {
                    apply_refresh(s, &RefreshEvent::PostUpdated(post));
                });
                Ok(())
            }
            SearchEvent::RemoveItem(id) => {
                self.screen.update(|s| {
                    s.remove_post(&id);
                });
                Ok(())
            }
            SearchEvent::OnRemoveHeadFromQueue => {
                self.screen.remove_head_from_queue();
                Ok(())
            }
        }
    }

    async fn new_search(&self) -> Result<(), ScreenError> {
        self.screen.update(|s| {
            s.posts.clear();
            s.profiles.clear();
            s.list_position = 0;
            s.page = 1;
        });
        let query = self.screen.read(|s| s.query.clone());
        if query.trim().is_empty() {
            return Ok(());
        }
        if query.starts_with('#') {
            let stream = self.search_posts.execute(query, None);
            self.screen.follow(stream, |s, posts| s.posts = posts).await;
        } else {
            let stream = self.search_profiles.execute(query);
            self.screen
                .follow(stream, |s, profiles| s.profiles = profiles)
                .await;
        }
        Ok(())
    }

    /// Hashtag results page by cursor; profile results come in one page.
    async fn next_page(&self) -> Result<(), ScreenError> {
        let (query, position, page, cursor) = self.screen.read(|s| {
            (
                s.query.clone(),
                s.list_position,
                s.page,
                s.posts.last().map(|p| p.created_at.clone()),
            )
        });
        let threshold = i64::from(page) * i64::from(PAGE_SIZE);
        if !query.starts_with('#') || i64::from(position) + 1 < threshold {
            return Ok(());
        }
        let Some(cursor) = cursor else {
            return Ok(());
        };
        self.screen.update(|s| s.page = s.page.saturating_add(1));

        let stream = self.search_posts.execute(query, Some(cursor));
        self.screen
            .follow(stream, |s, posts| s.posts.extend(posts))
            .await;
        Ok(())
    }

    async fn dispatch(&self, input: Input<SearchEvent>) {
        match input {
            Input::Event(event) => {
                let _ = self.on_trigger_event(event).await;
            }
            Input::Refresh(event) => self.screen.update(|s| {
                apply_refresh(s, &event);
                if let RefreshEvent::ProfileUpdated(profile) = &event {
                    if let Some(slot) = s.profiles.iter_mut().find(|p| p.id == profile.id) {
                        *slot = profile.clone();
                    }
                }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::api::test_support::{page_json, post_json, profile_json};
    use crate::interactors::test_support::{setup, url};
    use crate::state::posts::test_support::actions;
    use crate::state::RefreshBus;

    fn view_model() -> (std::sync::Arc<crate::adapters::mock::MockHttpClient>, SearchViewModel) {
        let (http, api, store) = setup();
        let bus = RefreshBus::new();
        let vm = SearchViewModel::new(
            SearchPosts::new(api.clone(), store.clone()),
            SearchProfiles::new(api.clone(), store.clone()),
            actions(&api, &store, &bus),
        );
        (http, vm)
    }

    #[tokio::test]
    async fn test_hashtag_query_searches_posts() {
        let (http, vm) = view_model();
        http.set_response(
            &url("posts?search=%23rust"),
            MockResponse::json(
                200,
                &page_json(vec![post_json("p1", "u1", "2021-01-01T00:00:00Z")], false),
            ),
        );

        vm.on_trigger_event(SearchEvent::UpdateQuery("#rust".into())).await.unwrap();
        vm.on_trigger_event(SearchEvent::NewSearch).await.unwrap();

        let state = vm.state();
        assert!(state.is_post_search());
        assert_eq!(state.posts.len(), 1);
        assert!(state.profiles.is_empty());
    }

    #[tokio::test]
    async fn test_plain_query_searches_profiles() {
        let (http, vm) = view_model();
        http.set_response(
            &url("profiles?search=ali"),
            MockResponse::json(200, &vec![profile_json("u1", "alice")]),
        );

        vm.on_trigger_event(SearchEvent::UpdateQuery("ali".into())).await.unwrap();
        vm.on_trigger_event(SearchEvent::NewSearch).await.unwrap();

        let state = vm.state();
        assert_eq!(state.profiles.len(), 1);
        assert_eq!(state.profiles[0].username, "alice");
        assert!(state.posts.is_empty());
    }

    #[tokio::test]
    async fn test_new_search_replaces_results() {
        let (http, vm) = view_model();
        http.set_response(
            &url("profiles?search=ali"),
            MockResponse::json(200, &vec![profile_json("u1", "alice")]),
        );
        http.set_response(&url("posts?search=%23none"), MockResponse::json(200, &page_json(vec![], false)));

        vm.on_trigger_event(SearchEvent::UpdateQuery("ali".into())).await.unwrap();
        vm.on_trigger_event(SearchEvent::NewSearch).await.unwrap();
        vm.on_trigger_event(SearchEvent::UpdateQuery("#none".into())).await.unwrap();
        vm.on_trigger_event(SearchEvent::NewSearch).await.unwrap();

        let state = vm.state();
        assert!(state.profiles.is_empty());
        assert!(state.posts.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_does_nothing() {
        let (http, vm) = view_model();
        vm.on_trigger_event(SearchEvent::NewSearch).await.unwrap();
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_hashtag_next_page_at_max_scroll_position() {
        let (http, vm) = view_model();
        vm.on_trigger_event(SearchEvent::UpdateQuery("#rust".into())).await.unwrap();
        vm.on_trigger_event(SearchEvent::OnUpdateScrollPosition(u32::MAX)).await.unwrap();

        vm.on_trigger_event(SearchEvent::NextPage).await.unwrap();

        assert!(http.get_requests().is_empty());
        assert_eq!(vm.state().page, 1);
    }

    #[tokio::test]
    async fn test_profile_results_do_not_page() {
        let (http, vm) = view_model();
        vm.on_trigger_event(SearchEvent::UpdateQuery("ali".into())).await.unwrap();
        vm.on_trigger_event(SearchEvent::OnUpdateScrollPosition(50)).await.unwrap();
        vm.on_trigger_event(SearchEvent::NextPage).await.unwrap();
        assert!(http.get_requests().is_empty());
        assert_eq!(vm.state().page, 1);
    }
}
