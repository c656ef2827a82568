//! Pure state transitions.
//!
//! [`reduce`] folds one [`Action`] into the current [`AppState`] and returns the
//! successor snapshot. It performs no I/O and never fails: malformed transitions
//! (an image update for an unknown photo) leave the state unchanged.
//!
//! # Rules
//!
//! - `SetInitialContent`: replaces every field
//! - `NewLocationDetected`: records the fix as last saved location
//! - `AddNewPhoto`: appends the photo (replaces in place if the id is known)
//! - `UpdatePhotoWithImage`: replaces the matching photo in place
//! - `StartStopUpdating`: sets the tracking flag
//!
//! # Example
//!
//! ```rust
//! use locationstream::app::reduce;
//! use locationstream::{Action, AppState};
//!
//! let state = reduce(&AppState::default(), &Action::StartStopUpdating { is_updating: true });
//! assert!(state.is_getting_location);
//! ```

use crate::app::{Action, AppState};
use crate::domain::Photo;

/// Computes the state that follows `state` once `action` is applied.
#[must_use]
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let _span = tracing::debug_span!("reduce", action = action.kind()).entered();

    match action {
        Action::SetInitialContent {
            photos,
            is_updating,
            last_location,
        } => {
            tracing::debug!(
                photo_count = photos.len(),
                is_updating = is_updating,
                has_last_location = last_location.is_some(),
                "initial content set"
            );
            AppState::new(photos.clone(), *is_updating, *last_location)
        }
        Action::NewLocationDetected { location } => AppState {
            last_location_saved: Some(*location),
            ..state.clone()
        },
        Action::AddNewPhoto { photo, .. } => {
            let mut photos = state.photos.clone();
            if let Some(index) = state.position_of(photo.id) {
                tracing::debug!(photo_id = %photo.id, "photo already present, replacing");
                photos[index] = photo.clone();
            } else {
                photos.push(photo.clone());
            }
            AppState {
                photos,
                ..state.clone()
            }
        }
        Action::UpdatePhotoWithImage { photo } => replace_photo(state, photo),
        Action::StartStopUpdating { is_updating } => AppState {
            is_getting_location: *is_updating,
            ..state.clone()
        },
    }
}

fn replace_photo(state: &AppState, photo: &Photo) -> AppState {
    let Some(index) = state.position_of(photo.id) else {
        tracing::warn!(photo_id = %photo.id, "image update for unknown photo ignored");
        return state.clone();
    };

    let mut photos = state.photos.clone();
    photos[index] = photo.clone();
    AppState {
        photos,
        ..state.clone()
    }
}
