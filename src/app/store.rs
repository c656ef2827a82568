//! Single-snapshot state store.
//!
//! The [`Store`] owns the current [`AppState`] behind an `Arc`, runs every
//! dispatched [`Action`] through the middleware chain and the reducer, swaps in
//! the resulting snapshot and notifies subscribers.
//!
//! # Serialization
//!
//! `dispatch` may be called from any thread. Calls are serialized by a
//! single-writer lock, so the middleware chain, reducer and subscriber
//! notification for one action complete before the next action starts. A
//! dispatch issued from the thread that is already dispatching (a subscriber
//! reacting to a new state, for instance) is queued and processed right after
//! the current action instead of deadlocking.
//!
//! # Example
//!
//! ```rust
//! use locationstream::{Action, AppState, Location, Store};
//!
//! let store = Store::new(AppState::default(), vec![]);
//! let subscription = store.subscribe(|state: &AppState| {
//!     println!("{} photos", state.photos.len());
//! });
//!
//! store.dispatch(Action::NewLocationDetected { location: Location::new(1.0, 2.0) });
//! assert_eq!(store.state().last_location_saved, Some(Location::new(1.0, 2.0)));
//! assert!(store.unsubscribe(subscription));
//! ```

use crate::app::middleware::{Middleware, Next};
use crate::app::{reduce, Action, AppState};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::thread::{self, ThreadId};

/// Receives every new snapshot.
pub trait Subscriber: Send + Sync {
    fn new_state(&self, state: &AppState);
}

impl<F> Subscriber for F
where
    F: Fn(&AppState) + Send + Sync,
{
    fn new_state(&self, state: &AppState) {
        self(state);
    }
}

/// Token returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct StoreInner {
    state: RwLock<Arc<AppState>>,
    middleware: Vec<Arc<dyn Middleware>>,
    subscribers: Mutex<Vec<(SubscriptionId, Arc<dyn Subscriber>)>>,
    next_subscription: AtomicU64,
    dispatch_lock: Mutex<()>,
    dispatching_thread: Mutex<Option<ThreadId>>,
    pending: Mutex<VecDeque<Action>>,
}

/// Shared handle to the application store.
///
/// Cloning is cheap; all clones see the same snapshot.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates a store holding `initial` with a fixed middleware chain.
    #[must_use]
    pub fn new(initial: AppState, middleware: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(initial)),
                middleware,
                subscribers: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
                dispatch_lock: Mutex::new(()),
                dispatching_thread: Mutex::new(None),
                pending: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.inner.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Weak handle for work that must not keep the store alive.
    #[must_use]
    pub fn downgrade(&self) -> StoreHandle {
        StoreHandle(Arc::downgrade(&self.inner))
    }

    /// Registers `subscriber`; it is called after every subsequent dispatch.
    pub fn subscribe<S>(&self, subscriber: S) -> SubscriptionId
    where
        S: Subscriber + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.inner.subscribers).push((id, Arc::new(subscriber)));
        tracing::debug!(subscription = id.0, "subscriber added");
        id
    }

    /// Removes a subscriber. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.inner.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(subscription, _)| *subscription != id);
        let removed = subscribers.len() != before;
        drop(subscribers);

        tracing::debug!(subscription = id.0, removed = removed, "subscriber removed");
        removed
    }

    /// Runs `action` through the middleware chain and the reducer, then
    /// notifies subscribers with the new snapshot.
    pub fn dispatch(&self, action: Action) {
        let current = thread::current().id();
        if *lock(&self.inner.dispatching_thread) == Some(current) {
            tracing::debug!(action = action.kind(), "nested dispatch queued");
            lock(&self.inner.pending).push_back(action);
            return;
        }

        let _serialized = lock(&self.inner.dispatch_lock);
        let _owner = DispatchOwner::claim(&self.inner.dispatching_thread, current);

        let mut next = Some(action);
        while let Some(action) = next {
            self.process(action);
            next = lock(&self.inner.pending).pop_front();
        }
    }

    fn process(&self, action: Action) {
        let _span = tracing::debug_span!("dispatch", action = action.kind()).entered();

        let reducer = |action: Action| self.apply(&action);
        Next::new(&self.inner.middleware, self, &reducer).run(action);
    }

    fn apply(&self, action: &Action) {
        let next_state = Arc::new(reduce(&self.state(), action));
        *self.inner.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next_state);

        let subscribers: Vec<Arc<dyn Subscriber>> = lock(&self.inner.subscribers)
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();

        tracing::trace!(subscribers = subscribers.len(), "notifying subscribers");
        for subscriber in subscribers {
            subscriber.new_state(&next_state);
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state())
            .field("middleware", &self.inner.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Non-owning store handle carried by spawned effects.
#[derive(Clone)]
pub struct StoreHandle(Weak<StoreInner>);

impl StoreHandle {
    /// Dispatches `action` if the store is still alive.
    ///
    /// Returns `false` when the store has been dropped and the action was
    /// discarded.
    pub fn dispatch(&self, action: Action) -> bool {
        match self.upgrade() {
            Some(store) => {
                store.dispatch(action);
                true
            }
            None => {
                tracing::debug!(action = action.kind(), "store dropped, action discarded");
                false
            }
        }
    }

    /// Upgrades to a full store handle if the store is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Store> {
        self.0.upgrade().map(|inner| Store { inner })
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StoreHandle")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}

/// Marks the current thread as the dispatching one until dropped.
struct DispatchOwner<'a>(&'a Mutex<Option<ThreadId>>);

impl<'a> DispatchOwner<'a> {
    fn claim(slot: &'a Mutex<Option<ThreadId>>, thread: ThreadId) -> Self {
        *lock(slot) = Some(thread);
        Self(slot)
    }
}

impl Drop for DispatchOwner<'_> {
    fn drop(&mut self) {
        *lock(self.0) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
