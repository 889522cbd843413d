//! Mapping interactor failures to user-facing messages.

use serde::Deserialize;

use super::messages::*;
use super::InteractorError;
use crate::domain::{DataState, StateMessage};

#[derive(Debug, Deserialize)]
struct FieldError {
    field: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct FieldErrors {
    errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize)]
struct SingleError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SingleErrorBody {
    error: SingleError,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text for a 400 body: `{errors:[{field,message}]}` or `{error:{message}}`.
pub fn bad_request_message(body: &str) -> String {
    if body.contains("errors") {
        match serde_json::from_str::<FieldErrors>(body) {
            Ok(parsed) => parsed
                .errors
                .iter()
                .map(|e| format!("{} {}", capitalize(&e.field), e.message))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(_) => UNKNOWN_ERROR.to_string(),
        }
    } else {
        match serde_json::from_str::<SingleErrorBody>(body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => UNKNOWN_ERROR.to_string(),
        }
    }
}

/// Text for a 409 body.
pub fn conflict_message(body: &str) -> &'static str {
    if body.contains("email") {
        ERROR_EMAIL_IN_USE
    } else if body.contains("username") {
        ERROR_USERNAME_IN_USE
    } else {
        SERVER_ERROR
    }
}

/// Text for any interactor failure.
pub fn use_case_error_message(err: &InteractorError) -> String {
    if let InteractorError::Message(message) = err {
        return message.clone();
    }
    let body = match err {
        InteractorError::Api(api) => api.body().unwrap_or_default(),
        _ => "",
    };
    match err.status() {
        Some(404) => ERROR_POST_UNABLE_TO_RETRIEVE.to_string(),
        Some(401) => UNAUTHORIZED_ERROR.to_string(),
        Some(400) => bad_request_message(body),
        Some(409) => conflict_message(body).to_string(),
        Some(_) => SERVER_ERROR.to_string(),
        None => GENERIC_AUTH_ERROR.to_string(),
    }
}

/// Terminal error state for a failed interactor, shown as a dialog.
pub fn handle_use_case_error<T>(err: &InteractorError) -> DataState<T> {
    tracing::warn!("Use case failed (status {:?}): {}", err.status(), err);
    DataState::error(StateMessage::error_dialog(use_case_error_message(err)))
}

/// Text for a failed mutation on an existing post: 401 is reported as such,
/// everything else as a server error.
pub fn mutation_error_message(err: &InteractorError) -> &'static str {
    match err.status() {
        Some(401) => UNAUTHORIZED_ERROR,
        Some(_) => SERVER_ERROR,
        None => GENERIC_AUTH_ERROR,
    }
}

/// Text for a failed login.
pub fn login_error_message(err: &InteractorError) -> &'static str {
    match err.status() {
        Some(401) => INVALID_CREDENTIALS,
        Some(_) => SERVER_ERROR,
        None => GENERIC_AUTH_ERROR,
    }
}
