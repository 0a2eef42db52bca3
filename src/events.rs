use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Subscriber registry shared by the notifiers.
///
/// Callbacks are keyed by a monotonically increasing id so that removal via a
/// `Subscription` handle is exact and idempotent. The registry is only ever
/// touched from the notifier entry points (subscribe/unsubscribe/dispatch).
pub struct EventEmitter<E> {
    subscribers: Mutex<HashMap<u64, Callback<E>>>,
    next_id: AtomicU64,
}

impl<E> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a callback and return its id.
    pub fn add(&self, callback: Callback<E>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().unwrap().insert(id, callback);
        debug!("Added subscriber {}", id);
        id
    }

    /// Remove a callback by id. Removing an unknown id is a no-op.
    ///
    /// Returns true when a subscriber was actually removed, so callers can
    /// keep their registration reference count exact.
    pub fn remove(&self, id: u64) -> bool {
        let removed = self.subscribers.lock().unwrap().remove(&id).is_some();
        if removed {
            debug!("Removed subscriber {}", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    /// Deliver an event to every subscriber present at the start of the
    /// dispatch.
    ///
    /// The registry lock is released before any callback runs, so a
    /// callback may subscribe or unsubscribe on the same emitter without
    /// deadlocking.
    pub fn emit(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = {
            let subscribers = self.subscribers.lock().unwrap();
            subscribers.values().cloned().collect()
        };
        debug!("Dispatching event to {} subscriber(s)", callbacks.len());
        for callback in callbacks {
            callback(event);
        }
    }
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned from a subscribe call. `remove()` detaches the callback
/// and lets the owning notifier re-evaluate its registration invariant.
///
/// The handle carries its unsubscribe logic as a closure so notifiers of
/// different event types can hand out a uniform type. A handle whose
/// notifier has been dropped degrades to a no-op.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: Box<dyn FnOnce() + Send>) -> Self {
        Self {
            unsubscribe: Some(unsubscribe),
        }
    }

    /// No-op handle for unsupported platforms.
    pub fn noop() -> Self {
        Self { unsubscribe: None }
    }

    /// Detach the callback. Safe to call on a no-op handle.
    pub fn remove(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// Build a `Subscription` whose removal runs against the notifier's shared
/// state if it is still alive.
pub fn subscription_for<T, F>(inner: &Arc<T>, remove: F) -> Subscription
where
    T: Send + Sync + 'static,
    F: FnOnce(&Arc<T>) + Send + 'static,
{
    let weak: Weak<T> = Arc::downgrade(inner);
    Subscription::new(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            remove(&inner);
        }
    }))
}
