//! Another user's profile and their posts.

use super::posts::{apply_refresh, remove_from, PostActions, PostListState};
use super::refresh::RefreshEvent;
use super::screen::{Input, Screen, ScreenState};
use super::tabs::{HasTabbedPosts, TabLoader, TabbedPosts};
use crate::domain::{MessageQueue, NetworkStatus};
use crate::error::ScreenError;
use crate::interactors::GetProfile;
use crate::models::{Post, Profile};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub is_loading: bool,
    pub profile: Option<Profile>,
    pub tabs: TabbedPosts,
    pub queue: MessageQueue,
}

impl ScreenState for ProfileState {
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

impl PostListState for ProfileState {
    fn posts(&self) -> &[Post] {
        &self.tabs.posts
    }
    fn posts_mut(&mut self) -> &mut [Post] {
        &mut self.tabs.posts
    }
    fn remove_post(&mut self, id: &str) -> bool {
        remove_from(&mut self.tabs.posts, id)
    }
}

impl HasTabbedPosts for ProfileState {
    fn tabbed(&self) -> &TabbedPosts {
        &self.tabs
    }
    fn tabbed_mut(&mut self) -> &mut TabbedPosts {
        &mut self.tabs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEvent {
    /// Load the profile unless one is already shown
    GetProfile(String),
    OnChangeTab(usize),
    OnChangePostScrollPosition(u32),
    NextPage,
    OnToggleFollow,
    ToggleLike(String),
    ToggleRetweet(String),
    DeletePost(String),
    ConfirmDelete(String),
    CancelConfirmation,
    UpdateList(Post),
    RemoveItem(String),
    OnRemoveHeadFromQueue,
}

pub struct ProfileViewModel {
    screen: Screen<ProfileState, ProfileEvent>,
    get_profile: GetProfile,
    tabs: TabLoader,
    actions: PostActions,
    network: NetworkStatus,
}

impl ProfileViewModel {
    pub fn new(
        get_profile: GetProfile,
        tabs: TabLoader,
        actions: PostActions,
        network: NetworkStatus,
    ) -> Self {
        let screen = Screen::new(ProfileState::default()).with_refresh(actions.bus());
        Self {
            screen,
            get_profile,
            tabs,
            actions,
            network,
        }
    }

    pub fn screen(&self) -> &Screen<ProfileState, ProfileEvent> {
        &self.screen
    }

    pub fn state(&self) -> ProfileState {
        self.screen.snapshot()
    }

    pub async fn on_trigger_event(&self, event: ProfileEvent) -> Result<(), ScreenError> {
        let result = self.handle(event).await;
        if let Err(err) = &result {
            tracing::warn!("Profile event ignored: {}", err);
        }
        result
    }

    fn username(&self) -> Result<String, ScreenError> {
        self.screen
            .read(|s| s.profile.as_ref().map(|p| p.username.clone()))
            .ok_or(ScreenError::MissingProfile)
    }

    async fn handle(&self, event: ProfileEvent) -> Result<(), ScreenError> {
        match event {
            ProfileEvent::GetProfile(username) => {
                if self.screen.read(|s| s.profile.is_some()) {
                    return Ok(());
                }
                let stream = self.get_profile.execute(username, self.network.is_available());
                let last = self
                    .screen
                    .follow(stream, |s, profile| s.profile = Some(profile))
                    .await;
                if let Some(profile) = last.into_data() {
                    self.tabs.first_page(&self.screen, profile.username).await;
                }
                Ok(())
            }
            ProfileEvent::OnChangeTab(index) => {
                let username = self.username()?;
                self.tabs.change_tab(&self.screen, index, username).await;
                Ok(())
            }
            ProfileEvent::OnChangePostScrollPosition(position) => {
                self.screen.update(|s| s.tabs.scroll_position = position);
                Ok(())
            }
            ProfileEvent::NextPage => {
                let username = self.username()?;
                self.tabs.next_page(&self.screen, username).await;
                Ok(())
            }
            ProfileEvent::OnToggleFollow => {
                let username = self.username()?;
                if let Some(profile) = self.actions.toggle_follow(&self.screen, &username).await? {
                    self.screen.update(|s| s.profile = Some(profile));
                }
                Ok(())
            }
            ProfileEvent::ToggleLike(id) => self.actions.toggle_like(&self.screen, &id).await,
            ProfileEvent::ToggleRetweet(id) => self.actions.toggle_retweet(&self.screen, &id).await,
            ProfileEvent::DeletePost(id) => self.actions.confirm_delete(
                &self.screen,
                &id,
                ProfileEvent::ConfirmDelete(id.clone()),
                ProfileEvent::CancelConfirmation,
            ),
            ProfileEvent::ConfirmDelete(id) => {
                self.actions.delete(&self.screen, &id).await.map(|_| ())
            }
            ProfileEvent::CancelConfirmation => {
                self.screen.clear_queue();
                Ok(())
            }
            ProfileEvent::UpdateList(post) => {
                self.on_refresh(RefreshEvent::PostUpdated(post));
                Ok(())
            }
            ProfileEvent::RemoveItem(id) => {
                self.on_refresh(RefreshEvent::PostRemoved(id));
                Ok(())
            }
            ProfileEvent::OnRemoveHeadFromQueue => {
                self.screen.remove_head_from_queue();
                Ok(())
            }
        }
    }

    fn on_refresh(&self, event: RefreshEvent) {
        self.screen.update(|s| {
            apply_refresh(s, &event);
            if let RefreshEvent::ProfileUpdated(profile) = &event {
                if s.profile.as_ref().is_some_and(|p| p.id == profile.id) {
                    s.profile = Some(profile.clone());
                }
            }
        });
    }

    async fn dispatch(&self, input: Input<ProfileEvent>) {
        match input {
            Input::Event(event) => {
                let _ = self.on_trigger_event(event).await;
            }
            Input::Refresh(event) => self.on_refresh(event),
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
    use crate::api::ProfileTab;
    use crate::error::messages;
    use crate::interactors::test_support::{setup, url};
    use crate::interactors::GetProfilePosts;
    use crate::state::posts::test_support::actions;
    use crate::state::RefreshBus;

    fn view_model(online: bool) -> (std::sync::Arc<crate::adapters::mock::MockHttpClient>, ProfileViewModel) {
        let (http, api, store) = setup();
        let bus = RefreshBus::new();
        let network = NetworkStatus::new(online);
        let vm = ProfileViewModel::new(
            GetProfile::new(api.clone(), store.clone()),
            TabLoader::new(GetProfilePosts::new(api.clone(), store.clone()), network.clone()),
            actions(&api, &store, &bus),
            network,
        );
        (http, vm)
    }

    fn serve_alice(http: &crate::adapters::mock::MockHttpClient) {
        http.set_response(&url("profiles/alice"), MockResponse::json(200, &profile_json("u1", "alice")));
        http.set_response(
            &url("profiles/alice/posts"),
            MockResponse::json(
                200,
                &page_json(vec![post_json("p1", "u1", "2021-01-02T00:00:00Z")], false),
            ),
        );
        http.set_response(
            &url("profiles/alice/media"),
            MockResponse::json(200, &page_json(vec![], false)),
        );
    }

    #[tokio::test]
    async fn test_profile_then_posts() {
        let (http, vm) = view_model(true);
        serve_alice(&http);

        vm.on_trigger_event(ProfileEvent::GetProfile("alice".into())).await.unwrap();

        let state = vm.state();
        assert_eq!(state.profile.unwrap().id, "u1");
        assert_eq!(state.tabs.tab, ProfileTab::Posts);
        assert_eq!(state.tabs.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_change_tab_reloads() {
        let (http, vm) = view_model(true);
        serve_alice(&http);
        vm.on_trigger_event(ProfileEvent::GetProfile("alice".into())).await.unwrap();

        vm.on_trigger_event(ProfileEvent::OnChangeTab(1)).await.unwrap();

        let state = vm.state();
        assert_eq!(state.tabs.tab, ProfileTab::Media);
        assert!(state.tabs.posts.is_empty());
        assert_eq!(state.tabs.page, 1);
    }

    #[tokio::test]
    async fn test_toggle_follow_updates_header() {
        let (http, vm) = view_model(true);
        serve_alice(&http);
        vm.on_trigger_event(ProfileEvent::GetProfile("alice".into())).await.unwrap();

        let mut followed = profile_json("u1", "alice");
        followed["following"] = true.into();
        followed["followers"] = 1.into();
        http.set_method_response("POST", &url("profiles/alice/follow"), MockResponse::json(200, &followed));

        vm.on_trigger_event(ProfileEvent::OnToggleFollow).await.unwrap();

        let state = vm.state();
        assert!(state.profile.as_ref().unwrap().following);
        assert!(state.tabs.posts[0].profile.following);
        assert!(state.queue.is_empty());
    }

    #[tokio::test]
    async fn test_offline_unknown_profile() {
        let (_http, vm) = view_model(false);
        vm.on_trigger_event(ProfileEvent::GetProfile("ghost".into())).await.unwrap();

        let state = vm.state();
        assert!(state.profile.is_none());
        assert_eq!(
            state.queue.peek().unwrap().message,
            messages::ERROR_PROFILE_UNABLE_TO_RETRIEVE
        );
        assert_eq!(
            vm.on_trigger_event(ProfileEvent::OnToggleFollow).await,
            Err(ScreenError::MissingProfile)
        );
    }
}
