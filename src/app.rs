//! Composition root.
//!
//! [`MirageApp`] owns the shared pieces (API client, cache, preferences,
//! refresh bus, network flag, session) and builds a view-model for each
//! screen the host opens.

use std::sync::Arc;

use crate::adapters::{FileKeyValueStore, PersistentCookieJar, ReqwestHttpClient};
use crate::api::ApiClient;
use crate::cache::Store;
use crate::config::ClientConfig;
use crate::domain::NetworkStatus;
use crate::error::{ScreenError, StoreError};
use crate::interactors::{
    CheckPreviousAuthUser, CreatePost, DeletePost, GetAccount, GetAccountFromCache, GetFeed,
    GetPost, GetProfile, GetProfilePosts, Login, Logout, Register, RestorePosts, SearchPosts,
    SearchProfiles, ToggleFollow, ToggleLikePost, ToggleRetweetPost, UpdateAccount,
};
use crate::state::{
    AccountViewModel, CreatePostViewModel, LoginViewModel, PostActions, PostDetailViewModel,
    PostListViewModel, ProfileViewModel, RefreshBus, RegisterViewModel, SearchViewModel,
    SessionManager, TabLoader, UpdateAccountViewModel,
};
use crate::traits::{HttpClient, KeyValueStore};

/// The client core, wired together.
pub struct MirageApp {
    config: ClientConfig,
    api: ApiClient,
    store: Arc<Store>,
    prefs: Arc<dyn KeyValueStore>,
    bus: RefreshBus,
    network: NetworkStatus,
    session: Arc<SessionManager>,
}

impl MirageApp {
    /// Open the cache under the configured data directory and talk to the
    /// configured API over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, StoreError> {
        let store = Store::open(&config.database_path())?.with_page_size(config.page_size);
        let jar = Arc::new(PersistentCookieJar::load(config.cookie_path()));
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_cookie_jar(jar));
        let prefs: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::in_dir(config.data_dir()));
        tracing::info!(
            "Mirage client using {} with data in {}",
            config.api_url,
            config.data_dir.display()
        );
        Ok(Self::with_parts(config, http, store, prefs))
    }

    /// Assemble from explicit parts. Tests pass mocks here.
    pub fn with_parts(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        store: Store,
        prefs: Arc<dyn KeyValueStore>,
    ) -> Self {
        let api = ApiClient::new(config.api_url.clone(), http);
        let store = Arc::new(store);
        let session = Arc::new(SessionManager::new(
            CheckPreviousAuthUser::new(store.clone()),
            Logout::new(api.clone(), store.clone(), prefs.clone()),
            prefs.clone(),
        ));
        Self {
            config,
            api,
            store,
            prefs,
            bus: RefreshBus::new(),
            network: NetworkStatus::default(),
            session,
        }
    }

    /// Restore the previous session, if one was remembered.
    pub async fn start(&self) -> Result<(), ScreenError> {
        self.session.start().await
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn bus(&self) -> &RefreshBus {
        &self.bus
    }

    /// Shared connectivity flag. The host flips it as the network comes and goes.
    pub fn network(&self) -> &NetworkStatus {
        &self.network
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    // ---------------------------------------------------------------------
    // Screens
    // ---------------------------------------------------------------------

    pub fn login(&self) -> LoginViewModel {
        LoginViewModel::new(
            Login::new(self.api.clone(), self.store.clone(), self.prefs.clone()),
            self.session.clone(),
        )
    }

    pub fn register(&self) -> RegisterViewModel {
        RegisterViewModel::new(
            Register::new(self.api.clone(), self.store.clone(), self.prefs.clone()),
            self.session.clone(),
        )
    }

    pub fn feed(&self) -> PostListViewModel {
        PostListViewModel::new(
            GetFeed::new(self.api.clone(), self.store.clone()),
            RestorePosts::new(self.store.clone()),
            self.post_actions(),
            self.network.clone(),
        )
    }

    pub fn post_detail(&self) -> PostDetailViewModel {
        PostDetailViewModel::new(
            GetPost::new(self.api.clone(), self.store.clone()),
            self.post_actions(),
            self.network.clone(),
        )
    }

    pub fn create_post(&self) -> CreatePostViewModel {
        CreatePostViewModel::new(
            CreatePost::new(self.api.clone(), self.store.clone()),
            GetAccountFromCache::new(self.store.clone()),
            self.bus.clone(),
        )
    }

    pub fn search(&self) -> SearchViewModel {
        SearchViewModel::new(
            SearchPosts::new(self.api.clone(), self.store.clone()),
            SearchProfiles::new(self.api.clone(), self.store.clone()),
            self.post_actions(),
        )
    }

    pub fn profile(&self) -> ProfileViewModel {
        ProfileViewModel::new(
            GetProfile::new(self.api.clone(), self.store.clone()),
            self.tab_loader(),
            self.post_actions(),
            self.network.clone(),
        )
    }

    pub fn account(&self) -> AccountViewModel {
        AccountViewModel::new(
            GetAccount::new(self.api.clone(), self.store.clone()),
            self.tab_loader(),
            self.post_actions(),
            self.session.clone(),
        )
    }

    pub fn update_account(&self) -> UpdateAccountViewModel {
        UpdateAccountViewModel::new(
            GetAccountFromCache::new(self.store.clone()),
            UpdateAccount::new(self.api.clone(), self.store.clone()),
            self.bus.clone(),
        )
    }

    fn post_actions(&self) -> PostActions {
        PostActions::new(
            ToggleLikePost::new(self.api.clone(), self.store.clone()),
            ToggleRetweetPost::new(self.api.clone(), self.store.clone()),
            DeletePost::new(self.api.clone(), self.store.clone()),
            ToggleFollow::new(self.api.clone(), self.store.clone()),
            self.bus.clone(),
        )
    }

    fn tab_loader(&self) -> TabLoader {
        TabLoader::new(
            GetProfilePosts::new(self.api.clone(), self.store.clone()),
            self.network.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryKeyValueStore, MockHttpClient, MockResponse};
    use crate::api::test_support::{account_json, page_json, post_json, BASE};
    use crate::state::{AccountEvent, FeedEvent, LoginEvent};
    use crate::traits::PREVIOUS_AUTH_USER;

    struct Fixture {
        http: Arc<MockHttpClient>,
        prefs: Arc<InMemoryKeyValueStore>,
        app: MirageApp,
    }

    fn fixture(prefs: InMemoryKeyValueStore) -> Fixture {
        let http = Arc::new(MockHttpClient::new());
        let prefs = Arc::new(prefs);
        let app = MirageApp::with_parts(
            ClientConfig::new().with_api_url(BASE),
            http.clone(),
            Store::open_in_memory().unwrap(),
            prefs.clone(),
        );
        Fixture { http, prefs, app }
    }

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    #[tokio::test]
    async fn test_start_without_previous_user() {
        let f = fixture(InMemoryKeyValueStore::new());
        f.app.start().await.unwrap();

        let state = f.app.session().state();
        assert!(state.did_check_for_previous_auth_user);
        assert!(state.uid.is_none());
    }

    #[tokio::test]
    async fn test_login_then_feed_then_logout() {
        let f = fixture(InMemoryKeyValueStore::new());
        f.http.set_method_response(
            "POST",
            &url("accounts/login"),
            MockResponse::json(200, &account_json("a1", "alice")),
        );
        f.http.set_response(
            &url("posts/feed"),
            MockResponse::json(
                200,
                &page_json(vec![post_json("p1", "u2", "2021-01-01T00:00:00Z")], false),
            ),
        );
        f.http
            .set_method_response("POST", &url("accounts/logout"), MockResponse::json(200, &true));

        let login = f.app.login();
        login.on_trigger_event(LoginEvent::OnUpdateEmail("alice@mirage.test".into())).await.unwrap();
        login.on_trigger_event(LoginEvent::OnUpdatePassword("secret1".into())).await.unwrap();
        login.on_trigger_event(LoginEvent::Login).await.unwrap();
        assert_eq!(f.app.session().uid().as_deref(), Some("a1"));

        let feed = f.app.feed();
        feed.on_trigger_event(FeedEvent::Feed).await.unwrap();
        assert_eq!(feed.state().posts.len(), 1);

        let account = f.app.account();
        account.on_trigger_event(AccountEvent::ConfirmLogout).await.unwrap();
        assert!(!f.app.session().is_logged_in());
        assert!(f.prefs.get(PREVIOUS_AUTH_USER).is_none());
    }

    #[tokio::test]
    async fn test_previous_user_restored_from_cache() {
        let f = fixture(InMemoryKeyValueStore::with_value(PREVIOUS_AUTH_USER, "alice"));
        f.app
            .store()
            .upsert_account(&crate::models::fixtures::account("a1", "alice"))
            .unwrap();

        f.app.start().await.unwrap();
        assert_eq!(f.app.session().uid().as_deref(), Some("a1"));
    }

    #[test]
    fn test_new_opens_cache_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let app = MirageApp::new(ClientConfig::new().with_data_dir(dir.path())).unwrap();
        assert!(dir.path().join("mirage.db").exists());
        assert_eq!(app.store().page_size(), 20);
    }
}
