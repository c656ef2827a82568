//! Application layer: actions, state, reducer, store and middleware.
//!
//! This module implements the unidirectional data flow at the heart of the
//! crate. Collaborators (location provider, photo repository, image service)
//! sit outside it and are reached only through the effect stage.
//!
//! # Architecture
//!
//! ```text
//! Location fix → dispatch(Action) → Middleware chain → reduce → new AppState → subscribers
//!                     ↑                    │
//!                     └── follow-up ───────┘ (async effect: save photo, fetch image)
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Messages accepted by the store
//! - [`effects`]: Effect stage starting asynchronous work per action
//! - [`middleware`]: Interceptor chain and logging stage
//! - [`reducer`]: Pure state transitions
//! - [`state`]: Immutable application snapshot
//! - [`store`]: Snapshot holder, dispatch serialization and subscriptions
//!
//! # Example
//!
//! ```rust
//! use locationstream::app::{Action, AppState, LoggingMiddleware, Middleware, Store};
//! use locationstream::Location;
//! use std::sync::Arc;
//!
//! let middleware = vec![Arc::new(LoggingMiddleware) as Arc<dyn Middleware>];
//! let store = Store::new(AppState::default(), middleware);
//! store.dispatch(Action::NewLocationDetected { location: Location::new(1.0, 1.0) });
//! assert!(store.state().last_location_saved.is_some());
//! ```

pub mod actions;
pub mod effects;
pub mod middleware;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::Action;
pub use effects::EffectMiddleware;
pub use middleware::{LoggingMiddleware, Middleware, Next};
pub use reducer::reduce;
pub use state::AppState;
pub use store::{Store, StoreHandle, Subscriber, SubscriptionId};
