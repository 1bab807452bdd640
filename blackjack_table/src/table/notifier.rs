//! Outbound event fan-out.

use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::game::{Outbound, Recipient, TableEvent, entities::ConnectionId};

/// Delivers table events to connected participants. Sends are
/// fire-and-forget: a notifier never blocks the table.
pub trait Notifier {
    fn send_to_all(&mut self, event: &TableEvent);

    fn send_to_one(&mut self, id: &ConnectionId, event: &TableEvent);

    /// Deliver a batch in order.
    fn dispatch(&mut self, outbox: Vec<Outbound>) {
        for Outbound { recipient, event } in outbox {
            match recipient {
                Recipient::All => self.send_to_all(&event),
                Recipient::One(id) => self.send_to_one(&id, &event),
            }
        }
    }
}

/// Notifier backed by one bounded channel per connection. Each channel is
/// filled in the order events are produced, so a connection always sees
/// events in the order the table applied them.
#[derive(Debug, Default)]
pub struct SubscriberNotifier {
    subscribers: HashMap<ConnectionId, mpsc::Sender<TableEvent>>,
}

impl SubscriberNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, id: ConnectionId, sender: mpsc::Sender<TableEvent>) {
        self.subscribers.insert(id, sender);
    }

    pub fn unsubscribe(&mut self, id: &ConnectionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Returns false when the subscriber is gone and should be dropped.
    fn deliver(id: &ConnectionId, sender: &mpsc::Sender<TableEvent>, event: &TableEvent) -> bool {
        match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!(
                    "Subscriber {} channel full, dropping {}",
                    id,
                    event.name()
                );
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("Subscriber {} disconnected, removing", id);
                false
            }
        }
    }
}

impl Notifier for SubscriberNotifier {
    fn send_to_all(&mut self, event: &TableEvent) {
        self.subscribers
            .retain(|id, sender| Self::deliver(id, sender, event));
    }

    fn send_to_one(&mut self, id: &ConnectionId, event: &TableEvent) {
        let Some(sender) = self.subscribers.get(id) else {
            log::debug!("No subscriber {} for {}", id, event.name());
            return;
        };
        if !Self::deliver(id, sender, event) {
            self.subscribers.remove(id);
        }
    }
}
