//! In-process publish/subscribe channel for cross-widget notifications.
//!
//! Widgets that display the same logical item have no shared parent, so a
//! status change made in one place is broadcast here and every mounted
//! subscriber filters by item identity before acting. The bus is built per
//! session and handed around explicitly; tests construct their own.

use medialist_models::StatusChangeEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Named channels. Per-topic delivery is publish-ordered; nothing is
/// guaranteed across topics or across different items on the same topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// An item's status was confirmed by the service. Payload:
    /// [`StatusChangeEvent`].
    ContentStateUpdated,
    /// Session/profile data changed; subscribers re-read it.
    UserDataUpdated,
    /// Profile image changed.
    AvatarUpdated,
    /// Backing storage changed externally.
    Storage,
}

#[derive(Debug, Clone)]
pub enum BusMessage {
    StatusChange(StatusChangeEvent),
    /// No payload; the topic itself tells subscribers what to re-read.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&BusMessage) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: HashMap<Topic, Vec<(SubscriptionId, Handler)>>,
}

/// Process-wide event bus, cheap to clone and share.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; keep the returned id and pass it to
    /// [`unsubscribe`](Self::unsubscribe) on unmount.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&BusMessage) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().expect("bus lock poisoned");
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner
            .subscribers
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns false when the id was already gone.
    pub fn unsubscribe(&self, topic: Topic, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().expect("bus lock poisoned");
        if let Some(handlers) = inner.subscribers.get_mut(&topic) {
            let before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            return handlers.len() < before;
        }
        false
    }

    /// Synchronous fan-out to all current subscribers of `topic`, in
    /// subscription order. Publishing with no subscribers is a no-op.
    pub fn publish(&self, topic: Topic, message: BusMessage) {
        // Handlers are invoked outside the lock so they can subscribe or
        // publish themselves without deadlocking.
        let handlers: Vec<Handler> = {
            let inner = self.inner.lock().expect("bus lock poisoned");
            match inner.subscribers.get(&topic) {
                Some(handlers) => handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return,
            }
        };
        trace!("Publishing {:?} to {} subscriber(s)", topic, handlers.len());
        for handler in handlers {
            handler(&message);
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        let inner = self.inner.lock().expect("bus lock poisoned");
        inner.subscribers.get(&topic).map_or(0, |h| h.len())
    }
}
