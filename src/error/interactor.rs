//! Errors raised inside interactor bodies.
//!
//! These never leave an interactor: they are mapped to a terminal
//! `DataState::Error` by [`crate::error::handle_use_case_error`] or by an
//! interactor-specific mapping.

use thiserror::Error;

use super::{ApiError, StoreError};
use crate::traits::KeyValueError;

#[derive(Debug, Error)]
pub enum InteractorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] KeyValueError),

    /// Failure with a ready-made user message
    #[error("{0}")]
    Message(String),
}

impl InteractorError {
    /// HTTP status behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            InteractorError::Api(err) => err.status(),
            _ => None,
        }
    }
}
