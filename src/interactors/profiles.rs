use std::sync::Arc;

use crate::api::{ApiClient, ProfileTab};
use crate::cache::Store;
use crate::domain::{data_stream, DataState, DataStream, StateMessage};
use crate::error::messages::*;
use crate::error::{handle_use_case_error, InteractorError};
use crate::models::{Post, Profile};

/// Profile by username, from the cache when present.
#[derive(Debug, Clone)]
pub struct GetProfile {
    api: ApiClient,
    store: Arc<Store>,
}

impl GetProfile {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, username: String, is_network_available: bool) -> DataStream<Profile> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Option<Profile>, InteractorError> = async {
                if let Some(profile) = store.get_profile(&username)? {
                    return Ok(Some(profile));
                }
                if !is_network_available {
                    return Ok(None);
                }
                let profile = api.get_profile(&username).await?;
                store.upsert_profile(&profile)?;
                Ok(Some(profile))
            }
            .await;
            match result {
                Ok(Some(profile)) => DataState::data(profile),
                Ok(None) => DataState::error(StateMessage::error_dialog(
                    ERROR_PROFILE_UNABLE_TO_RETRIEVE,
                )),
                Err(err) if err.status() == Some(404) => DataState::error(
                    StateMessage::error_dialog(ERROR_PROFILE_UNABLE_TO_RETRIEVE),
                ),
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct SearchProfiles {
    api: ApiClient,
    store: Arc<Store>,
}

impl SearchProfiles {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, search: String) -> DataStream<Vec<Profile>> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Vec<Profile>, InteractorError> = async {
                let profiles = api.search_profiles(&search).await?;
                store.upsert_profiles(&profiles)?;
                Ok(profiles)
            }
            .await;
            match result {
                Ok(profiles) => DataState::data(profiles),
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

/// Posts, media or likes of one profile.
///
/// Offline, the posts and media tabs fall back to the author's cached rows.
/// Likes are not cached per user, so the tab is empty offline.
#[derive(Debug, Clone)]
pub struct GetProfilePosts {
    api: ApiClient,
    store: Arc<Store>,
}

impl GetProfilePosts {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(
        &self,
        tab: ProfileTab,
        username: String,
        cursor: Option<String>,
        is_network_available: bool,
    ) -> DataStream<Vec<Post>> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Vec<Post>, InteractorError> = async {
                if is_network_available {
                    let posts = api
                        .profile_posts(tab, &username, cursor.as_deref())
                        .await?
                        .into_posts();
                    store.upsert_posts(&posts, false)?;
                    return Ok(posts);
                }
                let author = match store.get_profile(&username)? {
                    Some(author) => author,
                    None => return Ok(Vec::new()),
                };
                let posts = match tab {
                    ProfileTab::Posts => {
                        store.get_author_posts(&author.id, cursor.as_deref(), false)?
                    }
                    ProfileTab::Media => {
                        store.get_author_posts(&author.id, cursor.as_deref(), true)?
                    }
                    ProfileTab::Likes => Vec::new(),
                };
                Ok(posts)
            }
            .await;
            match result {
                Ok(posts) => DataState::data(posts),
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

/// Follow or unfollow a profile.
#[derive(Debug, Clone)]
pub struct ToggleFollow {
    api: ApiClient,
    store: Arc<Store>,
}

impl ToggleFollow {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, username: String) -> DataStream<Profile> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Profile, InteractorError> = async {
                let profile = api.toggle_follow(&username).await?;
                let updated = store.update_follow(
                    &profile.username,
                    profile.followers,
                    profile.followee,
                    profile.following,
                )?;
                if !updated {
                    store.upsert_profile(&profile)?;
                }
                Ok(profile)
            }
            .await;
            match result {
                Ok(profile) => DataState::data_with_message(
                    Some(profile),
                    StateMessage::silent_success(SUCCESS_FOLLOW_TOGGLED),
                ),
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}
