//! Post-list behavior shared by the feed, search, profile and account screens.

use super::refresh::{RefreshBus, RefreshEvent};
use super::screen::{Screen, ScreenState};
use crate::domain::DataState;
use crate::error::{messages, ScreenError};
use crate::interactors::{DeletePost, ToggleFollow, ToggleLikePost, ToggleRetweetPost};
use crate::models::{Post, Profile};

/// A screen state that shows posts.
pub trait PostListState: ScreenState {
    fn posts(&self) -> &[Post];
    fn posts_mut(&mut self) -> &mut [Post];

    /// Drop a post. Returns whether it was shown.
    fn remove_post(&mut self, id: &str) -> bool;
}

pub fn find_post(posts: &[Post], id: &str) -> Option<Post> {
    posts.iter().find(|p| p.id == id).cloned()
}

/// Swap in `post` where its id appears. Returns whether it was present.
pub fn replace_post(posts: &mut [Post], post: &Post) -> bool {
    match posts.iter_mut().find(|p| p.id == post.id) {
        Some(slot) => {
            *slot = post.clone();
            true
        }
        None => false,
    }
}

pub fn remove_from(posts: &mut Vec<Post>, id: &str) -> bool {
    let before = posts.len();
    posts.retain(|p| p.id != id);
    posts.len() != before
}

/// Refresh the author embedded in every post by `profile`.
pub fn set_author(posts: &mut [Post], profile: &Profile) -> usize {
    let mut changed = 0;
    for post in posts.iter_mut().filter(|p| p.profile.id == profile.id) {
        post.profile = profile.clone();
        changed += 1;
    }
    changed
}

/// Reflect another screen's change. Returns whether the list changed.
pub fn apply_refresh<S: PostListState>(state: &mut S, event: &RefreshEvent) -> bool {
    match event {
        RefreshEvent::PostUpdated(post) => replace_post(state.posts_mut(), post),
        RefreshEvent::PostRemoved(id) => state.remove_post(id),
        RefreshEvent::ProfileUpdated(profile) => set_author(state.posts_mut(), profile) > 0,
        RefreshEvent::PostAdded(_) | RefreshEvent::AccountUpdated(_) => false,
    }
}

/// The per-post actions every list offers, and where their results are
/// announced.
#[derive(Debug, Clone)]
pub struct PostActions {
    like: ToggleLikePost,
    retweet: ToggleRetweetPost,
    delete: DeletePost,
    follow: ToggleFollow,
    bus: RefreshBus,
}

impl PostActions {
    pub fn new(
        like: ToggleLikePost,
        retweet: ToggleRetweetPost,
        delete: DeletePost,
        follow: ToggleFollow,
        bus: RefreshBus,
    ) -> Self {
        Self {
            like,
            retweet,
            delete,
            follow,
            bus,
        }
    }

    pub fn bus(&self) -> &RefreshBus {
        &self.bus
    }

    pub async fn toggle_like<S, E>(&self, screen: &Screen<S, E>, id: &str) -> Result<(), ScreenError>
    where
        S: PostListState,
        E: Send + 'static,
    {
        let post = lookup(screen, id)?;
        let last = screen
            .follow(self.like.execute(post), |s, updated| {
                replace_post(s.posts_mut(), &updated);
            })
            .await;
        self.settle(screen, id, last);
        Ok(())
    }

    pub async fn toggle_retweet<S, E>(
        &self,
        screen: &Screen<S, E>,
        id: &str,
    ) -> Result<(), ScreenError>
    where
        S: PostListState,
        E: Send + 'static,
    {
        let post = lookup(screen, id)?;
        let last = screen
            .follow(self.retweet.execute(post), |s, updated| {
                replace_post(s.posts_mut(), &updated);
            })
            .await;
        self.settle(screen, id, last);
        Ok(())
    }

    /// Follow or unfollow the author of a listed post.
    pub async fn toggle_follow<S, E>(
        &self,
        screen: &Screen<S, E>,
        username: &str,
    ) -> Result<Option<Profile>, ScreenError>
    where
        S: PostListState,
        E: Send + 'static,
    {
        let last = screen
            .follow(self.follow.execute(username.to_string()), |s, profile| {
                set_author(s.posts_mut(), &profile);
            })
            .await;
        let profile = last.into_data();
        if let Some(profile) = &profile {
            self.bus.publish(RefreshEvent::ProfileUpdated(profile.clone()));
        }
        Ok(profile)
    }

    /// Ask before deleting. The answer comes back as `proceed` or `cancel`
    /// through the screen's inbox.
    pub fn confirm_delete<S, E>(
        &self,
        screen: &Screen<S, E>,
        id: &str,
        proceed: E,
        cancel: E,
    ) -> Result<(), ScreenError>
    where
        S: PostListState,
        E: Clone + Send + Sync + 'static,
    {
        lookup(screen, id)?;
        screen.confirm(messages::CONFIRM_DELETE_POST, proceed, cancel);
        Ok(())
    }

    /// Delete a listed post. Returns whether it left the list.
    pub async fn delete<S, E>(&self, screen: &Screen<S, E>, id: &str) -> Result<bool, ScreenError>
    where
        S: PostListState,
        E: Send + 'static,
    {
        let post = lookup(screen, id)?;
        let last = screen.follow(self.delete.execute(post), |_, _| {}).await;
        if !matches!(last, DataState::Data { .. }) {
            return Ok(false);
        }
        screen.update(|s| {
            s.remove_post(id);
        });
        self.bus.publish(RefreshEvent::PostRemoved(id.to_string()));
        Ok(true)
    }

    /// Announce a toggle's outcome. A post the server no longer has is
    /// dropped from the list.
    fn settle<S, E>(&self, screen: &Screen<S, E>, id: &str, last: DataState<Post>)
    where
        S: PostListState,
        E: Send + 'static,
    {
        match last {
            DataState::Data {
                data: Some(post), ..
            } => {
                self.bus.publish(RefreshEvent::PostUpdated(post));
            }
            DataState::Data { data: None, .. } => {
                screen.update(|s| {
                    s.remove_post(id);
                });
                self.bus.publish(RefreshEvent::PostRemoved(id.to_string()));
            }
            DataState::Loading | DataState::Error(_) => {}
        }
    }
}

fn lookup<S: PostListState, E: Send + 'static>(
    screen: &Screen<S, E>,
    id: &str,
) -> Result<Post, ScreenError> {
    screen
        .read(|s| find_post(s.posts(), id))
        .ok_or_else(|| ScreenError::UnknownPost(id.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{post, profile};

    #[test]
    fn test_replace_and_remove() {
        let mut posts = vec![
            post("p1", "u1", "2021-01-02T00:00:00Z"),
            post("p2", "u1", "2021-01-01T00:00:00Z"),
        ];
        let liked = posts[1].toggled_like();
        assert!(replace_post(&mut posts, &liked));
        assert!(posts[1].liked);
        assert!(!replace_post(&mut posts, &post("p9", "u1", "x")));

        assert!(remove_from(&mut posts, "p1"));
        assert!(!remove_from(&mut posts, "p1"));
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_set_author_only_touches_that_author() {
        let mut posts = vec![
            post("p1", "u1", "2021-01-02T00:00:00Z"),
            post("p2", "u2", "2021-01-01T00:00:00Z"),
            post("p3", "u1", "2021-01-01T00:00:00Z"),
        ];
        let followed = profile("u1").toggled_follow();
        assert_eq!(set_author(&mut posts, &followed), 2);
        assert!(posts[0].profile.following);
        assert!(!posts[1].profile.following);
        assert!(posts[2].profile.following);
    }
}
