//! Errors returned by screen event handlers.
//!
//! A handler that cannot act on an event returns one of these instead of
//! silently doing nothing; the dispatcher logs it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    #[error("no profile loaded")]
    MissingProfile,

    #[error("no post loaded")]
    MissingPost,

    #[error("no account loaded")]
    MissingAccount,

    #[error("post {0} is not in the list")]
    UnknownPost(String),

    #[error("not signed in")]
    NotLoggedIn,

    #[error("invalid input: {0}")]
    Validation(String),
}
