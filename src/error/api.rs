//! Errors from the remote API client.

use thiserror::Error;

use crate::traits::HttpError;

/// Failure of one API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never got a response
    #[error("{0}")]
    Http(#[from] HttpError),

    /// Server answered with a non-2xx status
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body, when the server answered.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
