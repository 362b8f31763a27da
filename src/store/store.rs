use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::trace;

use super::Reducer;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    next_id: u64,
    entries: BTreeMap<u64, Subscriber<T>>,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// A thread-safe state container driven by a [`Reducer`].
///
/// Cloning a store yields another handle to the same state, so a store can be
/// handed to every component that needs it instead of living in a global.
///
/// # Examples
///
/// ```
/// use bakehouse::store::{Reducer, Store};
///
/// struct Counter;
///
/// impl Reducer for Counter {
///     type State = i64;
///     type Action = i64;
///
///     fn reduce(&self, state: &mut i64, delta: i64) {
///         *state += delta;
///     }
/// }
///
/// let store = Store::new(Counter, 0);
/// store.dispatch(5);
/// store.dispatch(-2);
/// assert_eq!(store.get(), 3);
/// ```
pub struct Store<R: Reducer> {
    reducer: Arc<R>,
    state: Arc<RwLock<R::State>>,
    subscribers: Arc<RwLock<Subscribers<R::State>>>,
}

impl<R: Reducer> Store<R> {
    /// Create a store with the given reducer and initial state.
    pub fn new(reducer: R, initial: R::State) -> Self {
        Self {
            reducer: Arc::new(reducer),
            state: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(RwLock::new(Subscribers::new())),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> R::State {
        read(&self.state).clone()
    }

    /// Read state through a closure without cloning it.
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&R::State) -> T,
    {
        f(&read(&self.state))
    }

    /// Run `action` through the reducer and notify subscribers.
    ///
    /// Subscribers run after the state lock is released and receive a
    /// snapshot, so they may read the store or dispatch again.
    pub fn dispatch(&self, action: R::Action) {
        trace!(?action, "dispatch");
        let snapshot = {
            let mut state = write(&self.state);
            self.reducer.reduce(&mut state, action);
            state.clone()
        };
        self.notify(&snapshot);
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every dispatch until the returned guard is
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&R::State) + Send + Sync + 'static,
    {
        let mut subscribers = write(&self.subscribers);
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.insert(id, Arc::new(callback));

        let weak: Weak<RwLock<Subscribers<R::State>>> = Arc::downgrade(&self.subscribers);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(subscribers) = weak.upgrade() {
                    write(&subscribers).entries.remove(&id);
                }
            })),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        read(&self.subscribers).entries.len()
    }

    fn notify(&self, state: &R::State) {
        let callbacks: Vec<Subscriber<R::State>> =
            read(&self.subscribers).entries.values().cloned().collect();
        for callback in callbacks {
            callback(state);
        }
    }
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            reducer: Arc::clone(&self.reducer),
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

/// RAII guard for a store subscription.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
