//! Event bus for countable, non-fatal events.

use crossbeam_channel::{bounded, Receiver, Sender};

/// Event bus for broadcasting events to whoever drains it.
#[derive(Debug)]
pub struct EventBus<E> {
    /// Sender for broadcasting events
    sender: Sender<E>,
    /// Receiver for collecting events
    receiver: Receiver<E>,
    /// Channel capacity
    capacity: usize,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl<E> EventBus<E> {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: E) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<E> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<E> {
        self.sender.clone()
    }
}
