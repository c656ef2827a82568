//! Start/stop lifecycle of the location stream.
//!
//! [`LocationUpdates`] mirrors a long-running background service. Requesting
//! updates asks the provider for fixes and, only once the provider accepted
//! the request, records the intent with `StartStopUpdating { is_updating: true }`.
//! A pump task then turns every fix into a `NewLocationDetected` dispatch until
//! the stream is removed or the provider runs dry. Removing updates stops the
//! pump and records `StartStopUpdating { is_updating: false }`.

use crate::app::{Action, Store, StoreHandle};
use crate::domain::error::Result;
use crate::location::provider::{LocationProvider, LocationRequest};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

struct Running {
    cancel: CancellationToken,
    exhausted: CancellationToken,
    task: JoinHandle<()>,
}

/// Feeds fixes from a [`LocationProvider`] into the store.
pub struct LocationUpdates {
    store: StoreHandle,
    request: LocationRequest,
    running: Mutex<Option<Running>>,
}

impl LocationUpdates {
    #[must_use]
    pub fn new(store: &Store, request: LocationRequest) -> Self {
        Self {
            store: store.downgrade(),
            request,
            running: Mutex::new(None),
        }
    }

    /// Parameters passed to providers.
    #[must_use]
    pub const fn request(&self) -> &LocationRequest {
        &self.request
    }

    /// Starts streaming fixes from `provider`.
    ///
    /// Does nothing if a stream is already running. Must be called from within
    /// a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the request is refused, for example
    /// [`LocationStreamError::PermissionDenied`](crate::LocationStreamError::PermissionDenied).
    /// The tracking intent is left unchanged in that case.
    pub async fn request_location_updates<P: LocationProvider>(
        &self,
        mut provider: P,
    ) -> Result<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            tracing::debug!("location updates already requested");
            return Ok(());
        }

        tracing::info!(
            interval_ms = self.request.interval.as_millis(),
            fastest_interval_ms = self.request.fastest_interval.as_millis(),
            priority = ?self.request.priority,
            "requesting location updates"
        );
        if let Err(e) = provider.request_updates(&self.request).await {
            tracing::error!(error = %e, "lost location permission, could not request updates");
            return Err(e);
        }

        self.store.dispatch(Action::StartStopUpdating { is_updating: true });

        let cancel = CancellationToken::new();
        let exhausted = CancellationToken::new();
        let task = tokio::spawn(
            pump(provider, self.store.clone(), cancel.clone(), exhausted.clone())
                .instrument(tracing::info_span!("location_updates")),
        );

        *running = Some(Running {
            cancel,
            exhausted,
            task,
        });
        Ok(())
    }

    /// Stops the running stream, if any, and records that updates are off.
    pub async fn remove_location_updates(&self) {
        tracing::info!("removing location updates");

        let running = self.running.lock().await.take();
        if let Some(running) = running {
            running.cancel.cancel();
            if let Err(e) = running.task.await {
                tracing::warn!(error = %e, "location pump ended abnormally");
            }
        }

        self.store.dispatch(Action::StartStopUpdating { is_updating: false });
    }

    /// Whether a stream is currently running.
    pub async fn is_requesting(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Resolves once the running provider has no more fixes, or immediately
    /// when no stream is running.
    pub async fn finished(&self) {
        let exhausted = self
            .running
            .lock()
            .await
            .as_ref()
            .map(|running| running.exhausted.clone());

        if let Some(exhausted) = exhausted {
            exhausted.cancelled().await;
        }
    }
}

impl std::fmt::Debug for LocationUpdates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationUpdates")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

async fn pump<P: LocationProvider>(
    mut provider: P,
    store: StoreHandle,
    cancel: CancellationToken,
    exhausted: CancellationToken,
) {
    let mut delivered = 0_usize;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            fix = provider.next_fix() => match fix {
                Some(location) => {
                    tracing::debug!(location = %location, "new location");
                    delivered += 1;
                    if !store.dispatch(Action::NewLocationDetected { location }) {
                        break;
                    }
                }
                None => {
                    tracing::info!(delivered, "location stream ended");
                    break;
                }
            },
        }
    }

    if let Err(e) = provider.remove_updates().await {
        tracing::warn!(error = %e, "failed to remove location updates");
    }
    exhausted.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::domain::{Location, LocationStreamError};
    use crate::location::ReplayLocationProvider;
    use std::sync::{Arc, Mutex as StdMutex};

    fn recording_store() -> (Store, Arc<StdMutex<Vec<Action>>>) {
        use crate::app::{Middleware, Next};

        struct Record(Arc<StdMutex<Vec<Action>>>);
        impl Middleware for Record {
            fn handle(&self, _store: &Store, action: Action, next: Next<'_>) {
                self.0.lock().unwrap().push(action.clone());
                next.run(action);
            }
        }

        let log = Arc::new(StdMutex::new(Vec::new()));
        let store = Store::new(
            AppState::default(),
            vec![Arc::new(Record(Arc::clone(&log))) as Arc<dyn Middleware>],
        );
        (store, log)
    }

    #[tokio::test(start_paused = true)]
    async fn fixes_become_actions_after_start() {
        let (store, log) = recording_store();
        let updates = LocationUpdates::new(&store, LocationRequest::default());
        let provider =
            ReplayLocationProvider::new(vec![Location::new(1.0, 1.0), Location::new(2.0, 2.0)]);

        updates.request_location_updates(provider).await.unwrap();
        updates.finished().await;

        assert_eq!(
            log.lock().unwrap()[0],
            Action::StartStopUpdating { is_updating: true }
        );
        assert!(store.state().is_getting_location);
        assert_eq!(store.state().last_location_saved, Some(Location::new(2.0, 2.0)));
    }

    #[tokio::test]
    async fn refused_permission_dispatches_nothing() {
        let (store, log) = recording_store();
        let updates = LocationUpdates::new(&store, LocationRequest::default());
        let provider =
            ReplayLocationProvider::new(vec![Location::new(1.0, 1.0)]).with_permission(false);

        let result = updates.request_location_updates(provider).await;

        assert!(matches!(result, Err(LocationStreamError::PermissionDenied(_))));
        assert!(log.lock().unwrap().is_empty());
        assert!(!updates.is_requesting().await);
        updates.finished().await;
    }

    #[tokio::test(start_paused = true)]
    async fn removing_updates_stops_the_stream() {
        let (store, log) = recording_store();
        let updates = LocationUpdates::new(&store, LocationRequest::default());
        let provider =
            ReplayLocationProvider::new(vec![Location::new(1.0, 1.0), Location::new(5.0, 5.0)]);

        updates.request_location_updates(provider).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        updates.remove_location_updates().await;

        let actions = log.lock().unwrap().clone();
        assert_eq!(
            actions,
            vec![
                Action::StartStopUpdating { is_updating: true },
                Action::NewLocationDetected {
                    location: Location::new(1.0, 1.0)
                },
                Action::StartStopUpdating { is_updating: false },
            ]
        );
        assert!(!store.state().is_getting_location);
        assert!(!updates.is_requesting().await);
    }

    #[tokio::test(start_paused = true)]
    async fn second_request_is_ignored_while_running() {
        let (store, log) = recording_store();
        let updates = LocationUpdates::new(&store, LocationRequest::default());

        updates
            .request_location_updates(ReplayLocationProvider::new(vec![Location::new(1.0, 1.0)]))
            .await
            .unwrap();
        updates
            .request_location_updates(ReplayLocationProvider::new(vec![Location::new(9.0, 9.0)]))
            .await
            .unwrap();
        updates.finished().await;

        let starts = log
            .lock()
            .unwrap()
            .iter()
            .filter(|action| matches!(action, Action::StartStopUpdating { is_updating: true }))
            .count();
        assert_eq!(starts, 1);
        assert_eq!(store.state().last_location_saved, Some(Location::new(1.0, 1.0)));
    }
}
