use super::{segment, with_cursor, ApiClient, PostListResponse, ProfileDto};
use crate::error::ApiError;
use crate::models::Profile;

/// Post lists shown on a profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    Posts,
    Media,
    Likes,
}

impl ProfileTab {
    /// Tab at a screen index; anything past the last tab is `Likes`.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => ProfileTab::Posts,
            1 => ProfileTab::Media,
            _ => ProfileTab::Likes,
        }
    }

    pub fn index(self) -> usize {
        match self {
            ProfileTab::Posts => 0,
            ProfileTab::Media => 1,
            ProfileTab::Likes => 2,
        }
    }

    fn path(self) -> &'static str {
        match self {
            ProfileTab::Posts => "posts",
            ProfileTab::Media => "media",
            ProfileTab::Likes => "likes",
        }
    }
}

impl ApiClient {
    /// GET profiles?search=
    pub async fn search_profiles(&self, search: &str) -> Result<Vec<Profile>, ApiError> {
        let path = format!("profiles?search={}", urlencoding::encode(search));
        let dtos: Vec<ProfileDto> = self.get(&path).await?;
        Ok(dtos.into_iter().map(Profile::from).collect())
    }

    /// GET profiles/{username}
    pub async fn get_profile(&self, username: &str) -> Result<Profile, ApiError> {
        let dto: ProfileDto = self.get(&format!("profiles/{}", segment(username))).await?;
        Ok(dto.into())
    }

    /// GET profiles/{username}/{posts|media|likes}
    pub async fn profile_posts(
        &self,
        tab: ProfileTab,
        username: &str,
        cursor: Option<&str>,
    ) -> Result<PostListResponse, ApiError> {
        let path = format!("profiles/{}/{}", segment(username), tab.path());
        self.get(&with_cursor(path, cursor)).await
    }

    /// POST profiles/{username}/follow
    pub async fn toggle_follow(&self, username: &str) -> Result<Profile, ApiError> {
        let dto: ProfileDto = self
            .post_empty(&format!("profiles/{}/follow", segment(username)))
            .await?;
        Ok(dto.into())
    }
}
