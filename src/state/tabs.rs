//! Posts / media / likes tabs under a profile header.

use super::screen::{Screen, ScreenState};
use crate::api::ProfileTab;
use crate::domain::{NetworkStatus, PAGE_SIZE};
use crate::interactors::GetProfilePosts;
use crate::models::Post;

#[derive(Debug, Clone, PartialEq)]
pub struct TabbedPosts {
    pub tab: ProfileTab,
    pub page: u32,
    pub scroll_position: u32,
    pub posts: Vec<Post>,
}

impl Default for TabbedPosts {
    fn default() -> Self {
        Self {
            tab: ProfileTab::Posts,
            page: 1,
            scroll_position: 0,
            posts: Vec::new(),
        }
    }
}

impl TabbedPosts {
    pub fn reset(&mut self) {
        self.posts.clear();
        self.page = 1;
        self.scroll_position = 0;
    }

    /// Cursor for the next page, once the user has scrolled to the end of
    /// the loaded rows.
    pub fn next_cursor(&self) -> Option<String> {
        if self.scroll_position + 1 < self.page * PAGE_SIZE {
            return None;
        }
        self.posts.last().map(|p| p.created_at.clone())
    }
}

pub trait HasTabbedPosts: ScreenState {
    fn tabbed(&self) -> &TabbedPosts;
    fn tabbed_mut(&mut self) -> &mut TabbedPosts;
}

#[derive(Debug, Clone)]
pub struct TabLoader {
    get_posts: GetProfilePosts,
    network: NetworkStatus,
}

impl TabLoader {
    pub fn new(get_posts: GetProfilePosts, network: NetworkStatus) -> Self {
        Self { get_posts, network }
    }

    /// Switch tab and load its first page.
    pub async fn change_tab<S, E>(&self, screen: &Screen<S, E>, index: usize, username: String)
    where
        S: HasTabbedPosts,
        E: Send + 'static,
    {
        screen.update(|s| s.tabbed_mut().tab = ProfileTab::from_index(index));
        self.first_page(screen, username).await;
    }

    pub async fn first_page<S, E>(&self, screen: &Screen<S, E>, username: String)
    where
        S: HasTabbedPosts,
        E: Send + 'static,
    {
        screen.update(|s| s.tabbed_mut().reset());
        let tab = screen.read(|s| s.tabbed().tab);
        let stream = self
            .get_posts
            .execute(tab, username, None, self.network.is_available());
        screen
            .follow(stream, |s, posts| s.tabbed_mut().posts = posts)
            .await;
    }

    pub async fn next_page<S, E>(&self, screen: &Screen<S, E>, username: String)
    where
        S: HasTabbedPosts,
        E: Send + 'static,
    {
        let Some(cursor) = screen.read(|s| s.tabbed().next_cursor()) else {
            return;
        };
        let (tab, page) = screen.read(|s| (s.tabbed().tab, s.tabbed().page));
        tracing::debug!("Loading {:?} page {} before {}", tab, page + 1, cursor);
        screen.update(|s| s.tabbed_mut().page += 1);
        let stream = self
            .get_posts
            .execute(tab, username, Some(cursor), self.network.is_available());
        screen
            .follow(stream, |s, posts| s.tabbed_mut().posts.extend(posts))
            .await;
    }
}
