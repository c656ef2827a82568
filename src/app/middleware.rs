//! Interceptor chain run on every dispatched action before the reducer.
//!
//! Each [`Middleware`] receives the store, the action and a [`Next`]
//! continuation. Calling [`Next::run`] hands the action to the following stage;
//! after the last stage the action reaches the reducer. A stage that does not
//! call `run` drops the action, although none of the stages in this crate do.
//!
//! ```text
//! dispatch(action) → LoggingMiddleware → EffectMiddleware → reduce → subscribers
//!                                              │
//!                                              └── spawned effect ──→ dispatch(follow-up)
//! ```

use crate::app::{Action, Store};
use std::sync::Arc;

/// A stage of the dispatch pipeline.
pub trait Middleware: Send + Sync {
    /// Handles `action` and forwards it through `next`.
    fn handle(&self, store: &Store, action: Action, next: Next<'_>);
}

/// Continuation to the remaining pipeline stages.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    store: &'a Store,
    reducer: &'a dyn Fn(Action),
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        chain: &'a [Arc<dyn Middleware>],
        store: &'a Store,
        reducer: &'a dyn Fn(Action),
    ) -> Self {
        Self { chain, store, reducer }
    }

    /// Passes `action` to the next stage, or to the reducer after the last one.
    pub fn run(self, action: Action) {
        match self.chain.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    chain: rest,
                    store: self.store,
                    reducer: self.reducer,
                };
                stage.handle(self.store, action, next);
            }
            None => (self.reducer)(action),
        }
    }
}

/// Records every action together with the dispatching thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn handle(&self, _store: &Store, action: Action, next: Next<'_>) {
        tracing::debug!(
            thread = ?std::thread::current().id(),
            action = ?action,
            "new action dispatched"
        );
        next.run(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        forward: bool,
    }

    impl Middleware for Recorder {
        fn handle(&self, _store: &Store, action: Action, next: Next<'_>) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, action.kind()));
            if self.forward {
                next.run(action);
            }
        }
    }

    fn recorder(
        name: &'static str,
        log: &Arc<Mutex<Vec<String>>>,
        forward: bool,
    ) -> Arc<dyn Middleware> {
        Arc::new(Recorder {
            name,
            log: Arc::clone(log),
            forward,
        })
    }

    #[test]
    fn stages_run_in_order_before_reducer() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = Store::new(
            AppState::default(),
            vec![
                Arc::new(LoggingMiddleware) as Arc<dyn Middleware>,
                recorder("first", &log, true),
                recorder("second", &log, true),
            ],
        );

        let seen = Arc::clone(&log);
        store.subscribe(move |_: &AppState| seen.lock().unwrap().push("reduced".to_string()));
        store.dispatch(Action::StartStopUpdating { is_updating: true });

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:StartStopUpdating", "second:StartStopUpdating", "reduced"]
        );
        assert!(store.state().is_getting_location);
    }

    #[test]
    fn stage_that_does_not_forward_stops_the_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = Store::new(
            AppState::default(),
            vec![recorder("gate", &log, false), recorder("after", &log, true)],
        );

        store.dispatch(Action::StartStopUpdating { is_updating: true });

        assert_eq!(*log.lock().unwrap(), vec!["gate:StartStopUpdating"]);
        assert!(!store.state().is_getting_location);
    }
}
