//! Change notification hook.
//!
//! Every matrix owns an [`Observers`] list. Storage engines call
//! [`Observers::notify`] after each successful mutation; calculation nodes
//! subscribe a forwarder to their sources so that a change anywhere up a
//! source chain reaches the node's own subscribers.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::Observers;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let observers = Observers::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//! let counter = hits.clone();
//! let id = observers.subscribe(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! observers.notify();
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//!
//! assert!(observers.unsubscribe(id));
//! observers.notify();
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Subscribers to "state may have changed" notifications.
#[derive(Default)]
pub struct Observers {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a subscriber. Returns whether it was present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Call every subscriber. Listeners run outside the lock, so they may
    /// subscribe or notify re-entrantly.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_all_subscribers() {
        let observers = Observers::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = hits.clone();
            observers.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        observers.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(observers.len(), 3);
    }

    #[test]
    fn test_unsubscribe_unknown() {
        let observers = Observers::new();
        let id = observers.subscribe(|| {});
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        assert!(observers.is_empty());
    }

    #[test]
    fn test_reentrant_subscribe_does_not_deadlock() {
        let observers = Arc::new(Observers::new());
        let inner = observers.clone();
        observers.subscribe(move || {
            inner.subscribe(|| {});
        });
        observers.notify();
        assert_eq!(observers.len(), 2);
    }
}
