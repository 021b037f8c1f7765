//! Subscriber lists for client events.
//!
//! Observers are invoked one at a time in subscription order. Emitters take a
//! snapshot first so no lock is held across an `.await` and an observer may
//! subscribe further observers while being called.

use parking_lot::RwLock;
use std::sync::Arc;

/// Ordered list of event observers.
pub struct ObserverList<T: ?Sized> {
    observers: RwLock<Vec<Arc<T>>>,
}

impl<T: ?Sized> ObserverList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Append an observer; it will be called after every existing one.
    pub fn subscribe(&self, observer: Arc<T>) {
        self.observers.write().push(observer);
    }

    /// Current observers, in subscription order.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.observers.read().clone()
    }

    /// Number of subscribed observers.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Whether nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }
}

impl<T: ?Sized> Default for ObserverList<T> {
    fn default() -> Self {
        Self::new()
    }
}
