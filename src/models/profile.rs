use serde::{Deserialize, Serialize};

/// Public profile of a user, also used as a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    /// Avatar URL
    pub image: String,
    pub bio: Option<String>,
    pub banner: Option<String>,
    pub followers: i64,
    pub followee: i64,
    /// Whether the signed-in user follows this profile
    pub following: bool,
    /// ISO-8601 creation timestamp
    pub created_at: String,
}

impl Profile {
    /// Copy with the follow state flipped and the follower count adjusted.
    pub fn toggled_follow(&self) -> Profile {
        let following = !self.following;
        let followers = if following {
            self.followers + 1
        } else {
            (self.followers - 1).max(0)
        };
        Profile {
            following,
            followers,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            id: "u1".into(),
            username: "alice".into(),
            display_name: "Alice".into(),
            image: "https://img.test/a.png".into(),
            bio: None,
            banner: None,
            followers: 0,
            followee: 3,
            following: false,
            created_at: "2021-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_toggled_follow_round_trip() {
        let followed = profile().toggled_follow();
        assert!(followed.following);
        assert_eq!(followed.followers, 1);
        assert_eq!(followed.followee, 3);

        let unfollowed = followed.toggled_follow();
        assert_eq!(unfollowed, profile());
    }

    #[test]
    fn test_toggled_follow_never_negative() {
        let odd = Profile {
            following: true,
            ..profile()
        };
        assert_eq!(odd.toggled_follow().followers, 0);
    }
}
