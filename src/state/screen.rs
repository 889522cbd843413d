//! Plumbing shared by every view-model.
//!
//! A [`Screen`] owns one state record, published through a `watch` channel so
//! any number of renderers can observe it, plus an inbox for events raised
//! outside a dispatch call (confirmation callbacks) and an optional
//! subscription to the [`RefreshBus`].

use futures::StreamExt;
use tokio::sync::{broadcast, mpsc, watch, Mutex};

use super::refresh::{RefreshBus, RefreshEvent};
use crate::domain::{AreYouSureCallback, DataState, DataStream, MessageQueue, MessageType};
use crate::domain::{StateMessage, UiComponentType};

/// Fields every screen state carries.
pub trait ScreenState: Clone + Send + Sync + 'static {
    fn queue(&self) -> &MessageQueue;
    fn queue_mut(&mut self) -> &mut MessageQueue;
    fn set_loading(&mut self, loading: bool);
}

/// Queue a message for the UI. Messages with no presentation are only logged.
pub fn queue_message(queue: &mut MessageQueue, message: StateMessage) {
    if message.ui_component_type.is_none() {
        tracing::debug!("Silent message: {}", message.message);
        return;
    }
    if !queue.add(message) {
        tracing::debug!("Message already queued, skipped");
    }
}

/// Something for a view-model to handle.
#[derive(Debug)]
pub enum Input<E> {
    Event(E),
    Refresh(RefreshEvent),
}

/// Receiving ends of the inbox and the bus, locked together.
struct Receivers<E> {
    pending: mpsc::UnboundedReceiver<E>,
    refresh: Option<broadcast::Receiver<RefreshEvent>>,
}

pub struct Screen<S, E> {
    state: watch::Sender<S>,
    inbox: mpsc::UnboundedSender<E>,
    receivers: Mutex<Receivers<E>>,
}

impl<S: ScreenState, E: Send + 'static> Screen<S, E> {
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        let (inbox, pending) = mpsc::unbounded_channel();
        Self {
            state,
            inbox,
            receivers: Mutex::new(Receivers {
                pending,
                refresh: None,
            }),
        }
    }

    /// Also receive cross-screen refresh events from `bus`.
    pub fn with_refresh(mut self, bus: &RefreshBus) -> Self {
        self.receivers.get_mut().refresh = Some(bus.subscribe());
        self
    }

    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.state.send_modify(f);
    }

    pub fn push_message(&self, message: StateMessage) {
        self.update(|s| queue_message(s.queue_mut(), message));
    }

    pub fn remove_head_from_queue(&self) {
        self.update(|s| {
            if s.queue_mut().remove_head().is_none() {
                tracing::debug!("Nothing to remove from message queue");
            }
        });
    }

    pub fn clear_queue(&self) {
        self.update(|s| s.queue_mut().clear());
    }

    /// Sender for events raised outside a dispatch call.
    pub fn inbox(&self) -> mpsc::UnboundedSender<E> {
        self.inbox.clone()
    }

    /// Queue an are-you-sure dialog whose answers arrive as inbox events.
    pub fn confirm(&self, text: &str, proceed: E, cancel: E)
    where
        E: Clone + Sync,
    {
        let (yes, no) = (self.inbox(), self.inbox());
        let callback = AreYouSureCallback::new(
            move || {
                let _ = yes.send(proceed.clone());
            },
            move || {
                let _ = no.send(cancel.clone());
            },
        );
        self.push_message(StateMessage::new(
            text,
            UiComponentType::AreYouSureDialog(callback),
            MessageType::Info,
        ));
    }

    /// Fold an interactor stream into the state.
    ///
    /// Every emission updates the loading flag and queues its message;
    /// `on_data` runs for each payload. Returns the terminal state.
    pub async fn follow<T: Clone>(
        &self,
        mut stream: DataStream<T>,
        mut on_data: impl FnMut(&mut S, T),
    ) -> DataState<T> {
        let mut last = DataState::Loading;
        while let Some(emission) = stream.next().await {
            let loading = emission.is_loading();
            let message = emission.message().cloned();
            let data = emission.data_ref().cloned();
            self.update(|s| {
                s.set_loading(loading);
                if let Some(data) = data {
                    on_data(s, data);
                }
                if let Some(message) = message {
                    queue_message(s.queue_mut(), message);
                }
            });
            last = emission;
        }
        last
    }

    /// Everything waiting in the inbox and on the bus, without blocking.
    ///
    /// Empty while a task is parked in [`Screen::next_input`]; that task
    /// receives the inputs instead.
    pub fn pending_inputs(&self) -> Vec<Input<E>> {
        let Ok(mut receivers) = self.receivers.try_lock() else {
            tracing::debug!("Inputs owned by a running loop");
            return Vec::new();
        };
        let mut inputs = Vec::new();
        if let Some(refresh) = receivers.refresh.as_mut() {
            inputs.extend(RefreshBus::drain(refresh).into_iter().map(Input::Refresh));
        }
        while let Ok(event) = receivers.pending.try_recv() {
            inputs.push(Input::Event(event));
        }
        inputs
    }

    /// Wait for the next inbox event or refresh event.
    pub async fn next_input(&self) -> Option<Input<E>> {
        let mut receivers = self.receivers.lock().await;
        let Receivers { pending, refresh } = &mut *receivers;
        let Some(refresh) = refresh.as_mut() else {
            return pending.recv().await.map(Input::Event);
        };
        loop {
            tokio::select! {
                event = pending.recv() => return event.map(Input::Event),
                result = refresh.recv() => match result {
                    Ok(event) => return Some(Input::Refresh(event)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Screen lagged, missed {} refresh events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return pending.recv().await.map(Input::Event);
                    }
                },
            }
        }
    }
}
