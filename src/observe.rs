//! Replay-latest value broadcaster.
//!
//! DESIGN
//! ======
//! A `Broadcaster` holds one current value and an ordered list of listeners.
//! `publish` snapshots the listener list and releases the lock before calling
//! anything, so listeners may publish, subscribe or unsubscribe re-entrantly.
//! A listener removed while a notification is in flight is skipped; one added
//! during it only sees later values.
//!
//! Every publish bumps a generation counter. A nested publish delivers its
//! value to every listener itself, so the outer round stops as soon as it
//! sees a newer generation: no listener receives a value older than one it
//! has already seen.

#[cfg(test)]
#[path = "observe_test.rs"]
mod observe_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    current: T,
    generation: u64,
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// What an in-flight publish does with its next listener.
enum Delivery {
    Deliver,
    /// Unsubscribed since the round started.
    Skip,
    /// A newer publish already notified everyone.
    Superseded,
}

/// Removal half of a registry, erased over the value type so
/// [`Subscription`] does not carry a type parameter.
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send> Detach for Mutex<Registry<T>> {
    fn detach(&self, id: u64) {
        let mut registry = self.lock().unwrap_or_else(PoisonError::into_inner);
        registry.listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}

/// One mutable value observed by any number of listeners.
pub struct Broadcaster<T> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Clone + Send + 'static> Broadcaster<T> {
    pub fn new(initial: T) -> Self {
        let registry = Registry { current: initial, generation: 0, next_id: 0, listeners: Vec::new() };
        Self { inner: Arc::new(Mutex::new(registry)) }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.lock().current.clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// `f` runs under the registry lock and must not touch this broadcaster.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().current)
    }

    /// Replace the current value and notify every listener, in subscription
    /// order, before returning.
    ///
    /// If a listener publishes again, the remaining listeners get only the
    /// newer value.
    pub fn publish(&self, value: T) {
        let (generation, listeners) = {
            let mut registry = self.lock();
            registry.current = value.clone();
            registry.generation += 1;
            (registry.generation, registry.listeners.clone())
        };
        for (id, listener) in listeners {
            match self.delivery(id, generation) {
                Delivery::Deliver => listener(&value),
                Delivery::Skip => {}
                Delivery::Superseded => return,
            }
        }
    }

    /// Register `listener`. It is called immediately with the current value,
    /// then with every published value until the returned handle is released.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let listener: Listener<T> = Arc::new(listener);
        let (id, current) = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Arc::clone(&listener)));
            (id, registry.current.clone())
        };
        listener(&current);

        let registry: Weak<dyn Detach> = Arc::downgrade(&self.inner) as Weak<dyn Detach>;
        Subscription { id, registry }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn delivery(&self, id: u64, generation: u64) -> Delivery {
        let registry = self.lock();
        if registry.generation != generation {
            Delivery::Superseded
        } else if registry.listeners.iter().any(|(listener_id, _)| *listener_id == id) {
            Delivery::Deliver
        } else {
            Delivery::Skip
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle returned by [`Broadcaster::subscribe`].
///
/// Unsubscribes on drop. `unsubscribe` may be called any number of times,
/// including from inside a notification.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
