use serde::{Deserialize, Serialize};

/// The signed-in user's own account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub image: String,
    pub banner: Option<String>,
    pub bio: Option<String>,
}
