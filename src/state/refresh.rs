//! Cross-screen change notifications.
//!
//! When one screen changes a post or the account, the others learn about it
//! through a [`RefreshBus`]: a tokio broadcast channel every view-model
//! subscribes to. Subscribers drain it with [`RefreshBus::drain`] or select
//! on it in their `run()` loop.

use tokio::sync::broadcast;

use crate::models::{Account, Post, Profile};

/// Default channel capacity. Slow subscribers skip what they missed.
pub const REFRESH_CAPACITY: usize = 64;

/// A change another screen may need to reflect.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshEvent {
    /// A post's counters or author changed
    PostUpdated(Post),
    /// A post was published
    PostAdded(Post),
    /// A post was deleted, by id
    PostRemoved(String),
    /// A profile's follow state changed
    ProfileUpdated(Profile),
    /// The signed-in account was edited
    AccountUpdated(Account),
}

/// Broadcast bus shared by all view-models of one app.
#[derive(Debug, Clone)]
pub struct RefreshBus {
    sender: broadcast::Sender<RefreshEvent>,
}

impl RefreshBus {
    pub fn new() -> Self {
        Self::with_capacity(REFRESH_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event. Returns how many subscribers will see it.
    pub fn publish(&self, event: RefreshEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(_) => {
                tracing::debug!("Refresh event dropped: no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.sender.subscribe()
    }

    /// Everything queued on `receiver` right now, without waiting.
    pub fn drain(receiver: &mut broadcast::Receiver<RefreshEvent>) -> Vec<RefreshEvent> {
        let mut events = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Refresh subscriber lagged, missed {} events", n);
                }
                Err(_) => break,
            }
        }
        events
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::post;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let bus = RefreshBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(RefreshEvent::PostRemoved("p1".into())), 2);

        assert_eq!(
            RefreshBus::drain(&mut a),
            vec![RefreshEvent::PostRemoved("p1".into())]
        );
        assert_eq!(RefreshBus::drain(&mut b).len(), 1);
        assert!(RefreshBus::drain(&mut a).is_empty());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = RefreshBus::new();
        assert_eq!(
            bus.publish(RefreshEvent::PostAdded(post("p1", "u1", "2021"))),
            0
        );
    }

    #[test]
    fn test_lagged_subscriber_keeps_latest() {
        let bus = RefreshBus::with_capacity(2);
        let mut rx = bus.subscribe();
        for i in 0..5 {
            bus.publish(RefreshEvent::PostRemoved(format!("p{}", i)));
        }
        let events = RefreshBus::drain(&mut rx);
        assert_eq!(
            events,
            vec![
                RefreshEvent::PostRemoved("p3".into()),
                RefreshEvent::PostRemoved("p4".into())
            ]
        );
    }
}
