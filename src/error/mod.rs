//! Error types and user-facing message mapping.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`ApiError`] | `api::ApiClient` (transport, status, decode) |
//! | [`StoreError`] | `cache::Store` (SQLite, JSON columns) |
//! | [`InteractorError`] | interactor bodies; never escapes an interactor |
//! | [`ScreenError`] | screen event handlers |
//!
//! Interactor failures become a terminal `DataState::Error` through
//! [`handle_use_case_error`] or one of the narrower mappings in
//! [`handling`].

mod api;
pub mod handling;
mod interactor;
pub mod messages;
mod screen;
mod store;

pub use api::ApiError;
pub use handling::{handle_use_case_error, use_case_error_message};
pub use interactor::InteractorError;
pub use screen::ScreenError;
pub use store::StoreError;
