//! Use cases, one type per user action.
//!
//! Every interactor exposes `execute(...)` returning a [`DataStream`]: a
//! `Loading` state followed by exactly one terminal `Data` or `Error`.
//! Failures never escape as `Err`; they are mapped to user-facing messages
//! inside the stream.
//!
//! [`DataStream`]: crate::domain::DataStream

mod account;
mod auth;
mod posts;
mod profiles;

pub use account::{GetAccount, GetAccountFromCache, UpdateAccount};
pub use auth::{CheckPreviousAuthUser, Login, Logout, Register};
pub use posts::{
    CreatePost, DeletePost, GetFeed, GetPost, RestorePosts, SearchPosts, ToggleLikePost,
    ToggleRetweetPost,
};
pub use profiles::{GetProfile, GetProfilePosts, SearchProfiles, ToggleFollow};

use crate::domain::{DataState, StateMessage};
use crate::error::{handle_use_case_error, messages, InteractorError};

/// Terminal state for a failed mutation on an existing post.
///
/// A 404 means the post is already gone on the server: `on_gone` removes the
/// local row and the UI is told it succeeded, with nothing to show.
fn post_mutation_failure<T>(
    err: InteractorError,
    on_gone: impl FnOnce() -> Result<(), InteractorError>,
) -> DataState<T> {
    if err.status() == Some(404) {
        if let Err(cleanup) = on_gone() {
            return handle_use_case_error(&cleanup);
        }
        tracing::info!("Post already gone on the server, removed locally");
        return DataState::data_with_message(
            None,
            StateMessage::silent_success(messages::SUCCESS_POST_DELETED),
        );
    }
    tracing::warn!("Post mutation failed (status {:?}): {}", err.status(), err);
    DataState::error(StateMessage::error_dialog(
        crate::error::handling::mutation_error_message(&err),
    ))
}
