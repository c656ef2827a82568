//! Effect stage of the middleware chain.
//!
//! [`EffectMiddleware`] looks at each action before it reaches the reducer and
//! starts at most one asynchronous chain for it:
//!
//! | Action                 | Effect chain                                                    | Follow-up              |
//! |------------------------|-----------------------------------------------------------------|------------------------|
//! | `NewLocationDetected`  | create photo (only for a useful fix)                            | `AddNewPhoto`          |
//! | `AddNewPhoto`          | resolve image URL, then persist it on the photo                 | `UpdatePhotoWithImage` |
//! | `StartStopUpdating`    | persist the tracking flag                                       | none                   |
//!
//! The action is always forwarded afterwards. Each chain runs as one tokio task
//! tracked by a [`TaskTracker`] and scoped by a [`CancellationToken`]. A failed
//! or empty step ends the chain: nothing is dispatched and the failure is only
//! logged. Chains started for different actions are independent and may finish
//! in any order; follow-ups carry the photo they refer to.

use crate::app::middleware::{Middleware, Next};
use crate::app::store::StoreHandle;
use crate::app::{Action, Store};
use crate::domain::{DistanceFilter, Location, Photo};
use crate::imagery::ImageService;
use crate::storage::PhotoRepository;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::Instrument;

/// Starts photo and image effects for dispatched actions.
pub struct EffectMiddleware {
    repository: Arc<dyn PhotoRepository>,
    images: Arc<dyn ImageService>,
    filter: DistanceFilter,
    runtime: Handle,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl EffectMiddleware {
    /// Creates the effect stage.
    ///
    /// Effects are spawned on `runtime`, which lets `dispatch` be called from
    /// threads that are not part of the runtime.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PhotoRepository>,
        images: Arc<dyn ImageService>,
        filter: DistanceFilter,
        runtime: Handle,
    ) -> Self {
        Self {
            repository,
            images,
            filter,
            runtime,
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Number of effect chains currently running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every running chain, including the follow-ups it
    /// triggers, has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Cancels chains that have not dispatched their follow-up yet and waits
    /// for them to unwind. Effects started afterwards end immediately.
    pub async fn shutdown(&self) {
        tracing::debug!(in_flight = self.tracker.len(), "shutting down effects");
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }

    fn spawn<F>(&self, span: tracing::Span, effect: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            tracing::debug!(parent: &span, "effects shut down, not started");
            return;
        }

        let cancel = self.cancel.clone();
        let task = async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => tracing::debug!("effect cancelled"),
                () = effect => {}
            }
        };
        self.tracker.spawn_on(task.instrument(span), &self.runtime);
    }

    fn on_new_location(&self, store: &Store, location: Location) {
        let last_saved = store.state().last_location_saved;
        if !self.filter.is_useful(&location, last_saved.as_ref()) {
            tracing::debug!(location = %location, "location too close to last one, no photo");
            return;
        }

        let span = tracing::debug_span!("save_photo", location = %location);
        self.spawn(
            span,
            save_photo(Arc::clone(&self.repository), store.downgrade(), location),
        );
    }

    fn on_new_photo(&self, store: &Store, photo: Photo) {
        let span = tracing::debug_span!("attach_image", photo_id = %photo.id);
        self.spawn(
            span,
            attach_image(
                Arc::clone(&self.repository),
                Arc::clone(&self.images),
                store.downgrade(),
                photo,
            ),
        );
    }

    fn on_tracking_changed(&self, is_updating: bool) {
        let repository = Arc::clone(&self.repository);
        let span = tracing::debug_span!("store_tracking_flag", is_updating);
        self.spawn(span, async move {
            if let Err(e) = repository.set_tracking_enabled(is_updating).await {
                tracing::warn!(error = %e, "failed to store tracking flag");
            }
        });
    }
}

impl Middleware for EffectMiddleware {
    fn handle(&self, store: &Store, action: Action, next: Next<'_>) {
        match &action {
            Action::NewLocationDetected { location } => self.on_new_location(store, *location),
            Action::AddNewPhoto { photo, .. } => self.on_new_photo(store, photo.clone()),
            Action::StartStopUpdating { is_updating } => self.on_tracking_changed(*is_updating),
            Action::SetInitialContent { .. } | Action::UpdatePhotoWithImage { .. } => {}
        }
        next.run(action);
    }
}

impl std::fmt::Debug for EffectMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectMiddleware")
            .field("filter", &self.filter)
            .field("in_flight", &self.tracker.len())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

async fn save_photo(repository: Arc<dyn PhotoRepository>, store: StoreHandle, location: Location) {
    match repository.create_photo_for_location(location).await {
        Ok(Some(photo)) => {
            tracing::debug!(photo_id = %photo.id, "photo saved");
            store.dispatch(Action::AddNewPhoto { photo, location });
        }
        Ok(None) => tracing::debug!("repository created no photo"),
        Err(e) => tracing::warn!(error = %e, "failed to save photo"),
    }
}

async fn attach_image(
    repository: Arc<dyn PhotoRepository>,
    images: Arc<dyn ImageService>,
    store: StoreHandle,
    photo: Photo,
) {
    let image_url = match images.resolve_image_url(photo.latitude, photo.longitude).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            tracing::warn!("no image available for photo location");
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to resolve image");
            return;
        }
    };

    match repository.persist_photo_with_image(&photo, &image_url).await {
        Ok(updated) => {
            tracing::debug!(image_url = %image_url, "image attached");
            store.dispatch(Action::UpdatePhotoWithImage { photo: updated });
        }
        Err(e) => tracing::warn!(error = %e, "failed to store photo image"),
    }
}
