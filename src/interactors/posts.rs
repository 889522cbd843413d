use std::sync::Arc;

use super::post_mutation_failure;
use crate::api::{ApiClient, MediaUpload};
use crate::cache::Store;
use crate::domain::{data_stream, DataState, DataStream, StateMessage};
use crate::error::messages::*;
use crate::error::{handle_use_case_error, InteractorError};
use crate::models::Post;

/// Timeline page. Online, the server page is cached first; the answer always
/// comes from the cache.
#[derive(Debug, Clone)]
pub struct GetFeed {
    api: ApiClient,
    store: Arc<Store>,
}

impl GetFeed {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    /// With a cursor, returns feed rows strictly older than it; otherwise
    /// page `page` (1-based).
    pub fn execute(
        &self,
        page: u32,
        cursor: Option<String>,
        is_network_available: bool,
    ) -> DataStream<Vec<Post>> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Vec<Post>, InteractorError> = async {
                if is_network_available {
                    let posts = api.feed(cursor.as_deref()).await?.into_posts();
                    store.upsert_posts(&posts, true)?;
                }
                let posts = match cursor.as_deref() {
                    Some(cursor) => store.get_feed_before(cursor)?,
                    None => store.get_feed_page(page)?,
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

/// Reload the first `page` pages of the feed from the cache.
#[derive(Debug, Clone)]
pub struct RestorePosts {
    store: Arc<Store>,
}

impl RestorePosts {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn execute(&self, page: u32) -> DataStream<Vec<Post>> {
        let store = self.store.clone();
        data_stream(async move {
            match store.restore_feed(page) {
                Ok(posts) => DataState::data(posts),
                Err(err) => handle_use_case_error(&InteractorError::from(err)),
            }
        })
    }
}

/// One post, from the cache when present.
#[derive(Debug, Clone)]
pub struct GetPost {
    api: ApiClient,
    store: Arc<Store>,
}

impl GetPost {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, id: String, is_network_available: bool) -> DataStream<Post> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Option<Post>, InteractorError> = async {
                if let Some(post) = store.get_post_by_id(&id)? {
                    return Ok(Some(post));
                }
                if !is_network_available {
                    return Ok(None);
                }
                let post = api.get_post(&id).await?;
                store.upsert_post(&post, false)?;
                Ok(Some(post))
            }
            .await;
            match result {
                Ok(Some(post)) => DataState::data(post),
                Ok(None) => DataState::error(StateMessage::error_dialog(
                    ERROR_POST_UNABLE_TO_RETRIEVE,
                )),
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

/// Publish a post with text, a file, or both.
#[derive(Debug, Clone)]
pub struct CreatePost {
    api: ApiClient,
    store: Arc<Store>,
}

impl CreatePost {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, text: Option<String>, file: Option<MediaUpload>) -> DataStream<Post> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let text = text.filter(|t| !t.trim().is_empty());
            let result: Result<Post, InteractorError> = async {
                if text.is_none() && file.is_none() {
                    return Err(InteractorError::Message(ERROR_MUST_SELECT_IMAGE.to_string()));
                }
                let post = api.create_post(text.as_deref(), file.as_ref()).await?;
                store.upsert_post(&post, true)?;
                Ok(post)
            }
            .await;
            match result {
                Ok(post) => {
                    tracing::info!("Created post {}", post.id);
                    DataState::data_with_message(
                        Some(post),
                        StateMessage::success_snackbar(SUCCESS_POST_CREATED),
                    )
                }
                Err(err) => handle_use_case_error(&err),
            }
        })
    }
}

/// Delete a post on the server, then hide it locally.
#[derive(Debug, Clone)]
pub struct DeletePost {
    api: ApiClient,
    store: Arc<Store>,
}

impl DeletePost {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, post: Post) -> DataStream<Post> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<(), InteractorError> = async {
                api.delete_post(&post.id).await?;
                store.soft_delete_post(&post.id)?;
                Ok(())
            }
            .await;
            match result {
                Ok(()) => {
                    tracing::info!("Deleted post {}", post.id);
                    DataState::data_with_message(
                        Some(post),
                        StateMessage::success_snackbar(SUCCESS_POST_DELETED),
                    )
                }
                Err(err) => post_mutation_failure(err, || {
                    store.delete_post(&post.id)?;
                    Ok(())
                }),
            }
        })
    }
}

/// Like or unlike a post.
#[derive(Debug, Clone)]
pub struct ToggleLikePost {
    api: ApiClient,
    store: Arc<Store>,
}

impl ToggleLikePost {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    /// On success the cache holds the server's counter and flag.
    pub fn execute(&self, post: Post) -> DataStream<Post> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Post, InteractorError> = async {
                let updated = api.toggle_like(&post.id).await?;
                if !store.update_likes(&updated.id, updated.likes, updated.liked)? {
                    store.upsert_post(&updated, false)?;
                }
                Ok(updated)
            }
            .await;
            match result {
                Ok(updated) => DataState::data(updated),
                Err(err) => post_mutation_failure(err, || {
                    store.delete_post(&post.id)?;
                    Ok(())
                }),
            }
        })
    }
}

/// Retweet or undo a retweet.
#[derive(Debug, Clone)]
pub struct ToggleRetweetPost {
    api: ApiClient,
    store: Arc<Store>,
}

impl ToggleRetweetPost {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn execute(&self, post: Post) -> DataStream<Post> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let result: Result<Post, InteractorError> = async {
                let updated = api.toggle_retweet(&post.id).await?;
                if !store.update_retweets(&updated.id, updated.retweets, updated.retweeted)? {
                    store.upsert_post(&updated, false)?;
                }
                Ok(updated)
            }
            .await;
            match result {
                Ok(updated) => DataState::data(updated),
                Err(err) => post_mutation_failure(err, || {
                    store.delete_post(&post.id)?;
                    Ok(())
                }),
            }
        })
    }
}

/// Hashtag search. The query always starts with `#`.
#[derive(Debug, Clone)]
pub struct SearchPosts {
    api: ApiClient,
    store: Arc<Store>,
}

impl SearchPosts {
    pub fn new(api: ApiClient, store: Arc<Store>) -> Self {
        Self { api, store }
    }

    pub fn hashtag(search: &str) -> String {
        if search.starts_with('#') {
            search.to_string()
        } else {
            format!("#{}", search)
        }
    }

    pub fn execute(&self, search: String, cursor: Option<String>) -> DataStream<Vec<Post>> {
        let api = self.api.clone();
        let store = self.store.clone();
        data_stream(async move {
            let query = Self::hashtag(&search);
            let result: Result<Vec<Post>, InteractorError> = async {
                let posts = api
                    .search_posts(&query, cursor.as_deref())
                    .await?
                    .into_posts();
                store.upsert_posts(&posts, false)?;
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
