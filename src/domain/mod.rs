//! Domain objects shared by interactors and screens.
//!
//! ## Domain Objects
//!
//! - [`DataState`] - Loading / data / error emitted by every interactor
//! - [`StateMessage`] - A user-facing message and how to present it
//! - [`MessageQueue`] - Deduplicating FIFO of pending messages
//! - [`NetworkStatus`] - Shared connectivity flag
//! - [`validation`] - Field validators for forms

pub mod connectivity;
pub mod data_state;
pub mod message_queue;
pub mod validation;

pub use connectivity::NetworkStatus;
pub use data_state::{
    data_stream, AreYouSureCallback, DataState, DataStream, MessageType, StateMessage,
    UiComponentType,
};
pub use message_queue::MessageQueue;

/// Rows per page for feed, search and profile lists.
pub const PAGE_SIZE: u32 = 20;
