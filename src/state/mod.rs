//! Screen view-models.
//!
//! Each view-model owns one state record published through a
//! `tokio::sync::watch` channel, and one `on_trigger_event` entry point.
//! Handlers that cannot act return a [`ScreenError`] after logging it.
//! Interactor output is folded into the state as it arrives; messages for
//! the user wait in the state's [`MessageQueue`] until the UI pops them.
//!
//! | View-model | Screen |
//! |------------|--------|
//! | [`SessionManager`] | who is signed in |
//! | [`LoginViewModel`], [`RegisterViewModel`] | auth forms |
//! | [`PostListViewModel`] | home feed |
//! | [`PostDetailViewModel`] | one post |
//! | [`CreatePostViewModel`] | compose |
//! | [`SearchViewModel`] | hashtag and profile search |
//! | [`ProfileViewModel`] | another user's profile |
//! | [`AccountViewModel`] | own profile, logout |
//! | [`UpdateAccountViewModel`] | edit profile |
//!
//! Screens learn about each other's changes through the [`RefreshBus`].
//!
//! [`ScreenError`]: crate::error::ScreenError
//! [`MessageQueue`]: crate::domain::MessageQueue

mod account;
mod auth;
mod create_post;
mod post_detail;
mod post_list;
pub mod posts;
mod profile;
mod refresh;
mod screen;
mod search;
mod session;
pub mod tabs;
mod update_account;

pub use account::{AccountEvent, AccountState, AccountViewModel};
pub use auth::{LoginEvent, LoginState, LoginViewModel, RegisterEvent, RegisterState, RegisterViewModel};
pub use create_post::{CreatePostEvent, CreatePostState, CreatePostViewModel};
pub use post_detail::{PostDetailEvent, PostDetailState, PostDetailViewModel};
pub use post_list::{FeedEvent, FeedState, PostListViewModel};
pub use posts::PostActions;
pub use profile::{ProfileEvent, ProfileState, ProfileViewModel};
pub use refresh::{RefreshBus, RefreshEvent, REFRESH_CAPACITY};
pub use screen::{queue_message, Input, Screen, ScreenState};
pub use search::{SearchEvent, SearchState, SearchViewModel};
pub use session::{SessionEvent, SessionManager, SessionState};
pub use tabs::TabLoader;
pub use update_account::{UpdateAccountEvent, UpdateAccountState, UpdateAccountViewModel};

pub use crate::domain::NetworkStatus;
