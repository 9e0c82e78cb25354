//! In-process publish/subscribe.
//!
//! Subscribers hold a [`Subscription`] handle. Dropping the handle or
//! calling [`EventBus::unsubscribe`] removes it; there is no ambient
//! listener list. Each subscriber has a bounded queue; events published
//! while it is full are dropped for that subscriber only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

pub type SubscriptionId = u64;

/// Queue length per subscriber when none is given.
pub const DEFAULT_CAPACITY: usize = 64;

type Senders<T> = HashMap<SubscriptionId, mpsc::Sender<T>>;

struct Inner<T> {
    next_id: AtomicU64,
    capacity: usize,
    subscribers: Mutex<Senders<T>>,
}

impl<T> Inner<T> {
    fn subscribers(&self) -> MutexGuard<'_, Senders<T>> {
        // A panic while holding this lock cannot leave the map half-written.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct EventBus<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<T> EventBus<T> {
    /// Bus whose subscribers each buffer at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                capacity: capacity.max(1),
                subscribers: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl<T: Clone + Send + 'static> EventBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.capacity);
        self.inner.subscribers().insert(id, tx);
        Subscription {
            id,
            rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a subscriber. Returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers().remove(&id).is_some()
    }

    /// Send `event` to every live subscriber and return how many got it.
    /// Subscribers whose receiver is gone are pruned; a subscriber with a
    /// full queue misses this event but stays registered.
    pub fn publish(&self, event: T) -> usize {
        let mut delivered = 0;
        self.inner
            .subscribers()
            .retain(|id, tx| match tx.try_send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    debug!(subscription = *id, "subscriber lagging, event dropped");
                    true
                }
                Err(TrySendError::Closed(_)) => false,
            });
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }
}

/// A live registration on an [`EventBus`].
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: mpsc::Receiver<T>,
    bus: Weak<Inner<T>>,
}

impl<T: Send + 'static> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next event. `None` once unsubscribed or the bus is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Turn the subscription into a stream; dropping the stream
    /// unsubscribes.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|event| (event, sub))
        })
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.subscribers().remove(&self.id);
        }
    }
}
