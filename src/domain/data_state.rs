//! Three-state results emitted by interactors.

use futures::future::{ready, Future};
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt;
use std::sync::Arc;

/// How a message should be presented.
#[derive(Clone)]
pub enum UiComponentType {
    /// Blocking dialog
    Dialog,
    /// Confirmation with proceed/cancel callbacks
    AreYouSureDialog(AreYouSureCallback),
    Snackbar,
    /// Not shown; used for diagnostic transitions
    None,
}

impl UiComponentType {
    pub fn is_none(&self) -> bool {
        matches!(self, UiComponentType::None)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            UiComponentType::Dialog => "dialog",
            UiComponentType::AreYouSureDialog(_) => "are-you-sure",
            UiComponentType::Snackbar => "snackbar",
            UiComponentType::None => "none",
        }
    }
}

/// Two presentations are equal when they are the same kind; callbacks are
/// not compared.
impl PartialEq for UiComponentType {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Debug for UiComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
    Info,
    None,
}

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Proceed/cancel pair carried by an are-you-sure message.
#[derive(Clone)]
pub struct AreYouSureCallback {
    proceed: Callback,
    cancel: Callback,
}

impl AreYouSureCallback {
    pub fn new(
        proceed: impl Fn() + Send + Sync + 'static,
        cancel: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            proceed: Arc::new(proceed),
            cancel: Arc::new(cancel),
        }
    }

    pub fn proceed(&self) {
        (self.proceed)()
    }

    pub fn cancel(&self) {
        (self.cancel)()
    }
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMessage {
    pub message: String,
    pub ui_component_type: UiComponentType,
    pub message_type: MessageType,
}

impl StateMessage {
    pub fn new(
        message: impl Into<String>,
        ui_component_type: UiComponentType,
        message_type: MessageType,
    ) -> Self {
        Self {
            message: message.into(),
            ui_component_type,
            message_type,
        }
    }

    /// Blocking error dialog.
    pub fn error_dialog(message: impl Into<String>) -> Self {
        Self::new(message, UiComponentType::Dialog, MessageType::Error)
    }

    /// Success snackbar.
    pub fn success_snackbar(message: impl Into<String>) -> Self {
        Self::new(message, UiComponentType::Snackbar, MessageType::Success)
    }

    /// Success that is not shown.
    pub fn silent_success(message: impl Into<String>) -> Self {
        Self::new(message, UiComponentType::None, MessageType::Success)
    }

    /// The are-you-sure callbacks, if this is a confirmation.
    pub fn callback(&self) -> Option<&AreYouSureCallback> {
        match &self.ui_component_type {
            UiComponentType::AreYouSureDialog(callback) => Some(callback),
            _ => None,
        }
    }
}

/// Result of one interactor step.
#[derive(Debug, Clone, PartialEq)]
pub enum DataState<T> {
    Loading,
    /// Success, with an optional payload and an optional message
    Data {
        data: Option<T>,
        message: Option<StateMessage>,
    },
    Error(StateMessage),
}

impl<T> DataState<T> {
    pub fn loading() -> Self {
        DataState::Loading
    }

    /// Success with a payload and no message.
    pub fn data(data: T) -> Self {
        DataState::Data {
            data: Some(data),
            message: None,
        }
    }

    /// Success with an optional payload and a message.
    pub fn data_with_message(data: Option<T>, message: StateMessage) -> Self {
        DataState::Data {
            data,
            message: Some(message),
        }
    }

    pub fn error(message: StateMessage) -> Self {
        DataState::Error(message)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataState::Error(_))
    }

    /// Payload of a successful step.
    pub fn data_ref(&self) -> Option<&T> {
        match self {
            DataState::Data { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            DataState::Data { data, .. } => data,
            _ => None,
        }
    }

    /// Message attached to a success or error.
    pub fn message(&self) -> Option<&StateMessage> {
        match self {
            DataState::Loading => None,
            DataState::Data { message, .. } => message.as_ref(),
            DataState::Error(message) => Some(message),
        }
    }
}

/// Stream of states produced by one interactor call.
pub type DataStream<T> = BoxStream<'static, DataState<T>>;

/// Emit `Loading`, then the single terminal state produced by `work`.
pub fn data_stream<T, F>(work: F) -> DataStream<T>
where
    T: Send + 'static,
    F: Future<Output = DataState<T>> + Send + 'static,
{
    stream::once(ready(DataState::Loading))
        .chain(stream::once(work))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_data_stream_emits_loading_then_terminal() {
        let states: Vec<DataState<u32>> = data_stream(async { DataState::data(7) })
            .collect()
            .await;
        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        assert_eq!(states[1].data_ref(), Some(&7));
    }

    #[tokio::test]
    async fn test_data_stream_error_terminal() {
        let states: Vec<DataState<u32>> =
            data_stream(async { DataState::error(StateMessage::error_dialog("boom")) })
                .collect()
                .await;
        assert!(states[1].is_error());
        assert_eq!(states[1].message().unwrap().message, "boom");
    }

    #[test]
    fn test_component_equality_ignores_callbacks() {
        let a = UiComponentType::AreYouSureDialog(AreYouSureCallback::new(|| {}, || {}));
        let b = UiComponentType::AreYouSureDialog(AreYouSureCallback::new(|| {}, || {}));
        assert_eq!(a, b);
        assert_ne!(a, UiComponentType::Dialog);
        assert_ne!(UiComponentType::Snackbar, UiComponentType::None);
    }

    #[test]
    fn test_callback_invocation() {
        let proceeded = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicUsize::new(0));
        let (p, c) = (proceeded.clone(), cancelled.clone());
        let message = StateMessage::new(
            "sure?",
            UiComponentType::AreYouSureDialog(AreYouSureCallback::new(
                move || {
                    p.fetch_add(1, Ordering::SeqCst);
                },
                move || {
                    c.fetch_add(1, Ordering::SeqCst);
                },
            )),
            MessageType::Info,
        );

        let callback = message.callback().unwrap();
        callback.proceed();
        callback.cancel();
        callback.cancel();
        assert_eq!(proceeded.load(Ordering::SeqCst), 1);
        assert_eq!(cancelled.load(Ordering::SeqCst), 2);
        assert!(StateMessage::error_dialog("x").callback().is_none());
    }

    #[test]
    fn test_message_accessors() {
        let state: DataState<u32> =
            DataState::data_with_message(None, StateMessage::silent_success("gone"));
        assert!(state.data_ref().is_none());
        assert_eq!(state.message().unwrap().message_type, MessageType::Success);
        assert!(state.message().unwrap().ui_component_type.is_none());
        assert!(DataState::<u32>::loading().message().is_none());
    }
}
