//! FIFO of pending user-facing messages.

use std::collections::VecDeque;

use super::StateMessage;

/// Pending messages, shown one at a time from the head.
///
/// A message is rejected when one with the same text and presentation kind
/// is already queued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageQueue {
    items: VecDeque<StateMessage>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, message: &StateMessage) -> bool {
        self.items.iter().any(|queued| {
            queued.message == message.message
                && queued.ui_component_type == message.ui_component_type
        })
    }

    /// Append a message; returns false for duplicates.
    pub fn add(&mut self, message: StateMessage) -> bool {
        if self.contains(&message) {
            return false;
        }
        self.items.push_back(message);
        true
    }

    pub fn peek(&self) -> Option<&StateMessage> {
        self.items.front()
    }

    /// Pop the head; `None` when empty.
    pub fn remove_head(&mut self) -> Option<StateMessage> {
        self.items.pop_front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateMessage> {
        self.items.iter()
    }
}
