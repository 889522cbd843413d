use serde::{Deserialize, Serialize};

use super::{Attachment, Profile};

/// A post joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: Option<String>,
    pub likes: i64,
    pub liked: bool,
    pub retweets: i64,
    pub retweeted: bool,
    pub is_retweet: bool,
    /// Single attachment sent by older servers
    pub file: Option<Attachment>,
    pub files: Vec<Attachment>,
    pub profile: Profile,
    /// ISO-8601 creation timestamp, also the pagination cursor
    pub created_at: String,
}

impl Post {
    /// All attachments, preferring `files` over the legacy `file`.
    pub fn attachments(&self) -> Vec<&Attachment> {
        if self.files.is_empty() {
            self.file.iter().collect()
        } else {
            self.files.iter().collect()
        }
    }

    pub fn has_media(&self) -> bool {
        !self.attachments().is_empty()
    }

    /// Copy with the like flag flipped and the counter adjusted with it.
    pub fn toggled_like(&self) -> Post {
        let (liked, likes) = toggle(self.liked, self.likes);
        Post {
            liked,
            likes,
            ..self.clone()
        }
    }

    /// Copy with the retweet flag flipped and the counter adjusted with it.
    pub fn toggled_retweet(&self) -> Post {
        let (retweeted, retweets) = toggle(self.retweeted, self.retweets);
        Post {
            retweeted,
            retweets,
            ..self.clone()
        }
    }
}

fn toggle(flag: bool, count: i64) -> (bool, i64) {
    if flag {
        (false, (count - 1).max(0))
    } else {
        (true, count + 1)
    }
}
