//! Wire types for the Mirage REST API.
//!
//! The server speaks camelCase except for `created_at`. Counters and flags
//! may be missing from older payloads and default to zero/false.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::models::{Account, Attachment, Post, Profile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentDto {
    pub url: String,
    pub filetype: String,
    pub filename: String,
}

impl From<AttachmentDto> for Attachment {
    fn from(dto: AttachmentDto) -> Self {
        Attachment {
            url: dto.url,
            filetype: dto.filetype,
            filename: dto.filename,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub image: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub followee: i64,
    #[serde(default)]
    pub following: bool,
    #[serde(rename = "created_at")]
    pub created_at: String,
}

impl From<ProfileDto> for Profile {
    fn from(dto: ProfileDto) -> Self {
        Profile {
            id: dto.id,
            username: dto.username,
            display_name: dto.display_name,
            image: dto.image,
            bio: dto.bio,
            banner: dto.banner,
            followers: dto.followers,
            followee: dto.followee,
            following: dto.following,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub retweets: i64,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub is_retweet: bool,
    /// Single attachment, still sent by older servers
    #[serde(default)]
    pub file: Option<AttachmentDto>,
    #[serde(default)]
    pub files: Option<Vec<AttachmentDto>>,
    pub author: ProfileDto,
    #[serde(rename = "created_at")]
    pub created_at: String,
}

impl From<PostDto> for Post {
    fn from(dto: PostDto) -> Self {
        Post {
            id: dto.id,
            text: dto.text,
            likes: dto.likes,
            liked: dto.liked,
            retweets: dto.retweets,
            retweeted: dto.retweeted,
            is_retweet: dto.is_retweet,
            file: dto.file.map(Attachment::from),
            files: dto
                .files
                .unwrap_or_default()
                .into_iter()
                .map(Attachment::from)
                .collect(),
            profile: dto.author.into(),
            created_at: dto.created_at,
        }
    }
}

/// One page of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<PostDto>,
    #[serde(default)]
    pub has_more: bool,
}

impl PostListResponse {
    pub fn into_posts(self) -> Vec<Post> {
        self.posts.into_iter().map(Post::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    pub image: String,
}

impl From<AccountResponse> for Account {
    fn from(dto: AccountResponse) -> Self {
        Account {
            id: dto.id,
            email: dto.email,
            username: dto.username,
            display_name: dto.display_name,
            image: dto.image,
            banner: dto.banner,
            bio: dto.bio,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub password: String,
}

/// Fields sent by `PUT accounts`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUpdate {
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub image: Option<MediaUpload>,
    pub banner: Option<MediaUpload>,
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl MediaUpload {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Upload whose MIME type follows the attachment kind (`image` or `video`).
    pub fn for_filetype(filename: impl Into<String>, filetype: &str, bytes: Bytes) -> Self {
        let filename = filename.into();
        let mime_type = Attachment::new("", filetype, filename.as_str()).mime_type();
        Self::new(filename, mime_type, bytes)
    }
}
