//! View model types representing the renderable photo list.
//!
//! View models are computed from an [`AppState`] snapshot and contain no
//! business logic, only display-ready data: rows newest first, which tracking
//! control is available and how many photos still wait for their image.
//!
//! # Example
//!
//! ```rust
//! use locationstream::ui::PhotoListViewModel;
//! use locationstream::{AppState, Location, Photo, PhotoId};
//!
//! let state = AppState::new(
//!     vec![
//!         Photo::new(PhotoId(1), Location::new(10.0, 10.0)),
//!         Photo::new(PhotoId(2), Location::new(11.0, 11.0)),
//!     ],
//!     true,
//!     None,
//! );
//! let vm = PhotoListViewModel::from_state(&state);
//! assert_eq!(vm.rows[0].id, PhotoId(2));
//! assert!(vm.controls.can_stop);
//! ```

use crate::app::AppState;
use crate::domain::{Location, Photo, PhotoId};

/// Complete view model of the photo list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoListViewModel {
    /// Photos, most recent capture first.
    pub rows: Vec<PhotoRow>,

    pub controls: TrackingControls,

    /// Photos whose image has not arrived yet.
    pub pending_images: usize,

    /// Shown instead of the list when there are no photos.
    pub empty_state: Option<EmptyState>,
}

/// One photo in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRow {
    pub id: PhotoId,
    pub location: Location,

    /// `None` while the image is still being fetched.
    pub image_url: Option<String>,
}

/// Availability of the start and stop controls.
///
/// Exactly one of the two is enabled at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingControls {
    pub can_start: bool,
    pub can_stop: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

impl PhotoListViewModel {
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        let rows: Vec<PhotoRow> = state.photos.iter().rev().map(PhotoRow::from).collect();

        let empty_state = rows.is_empty().then(|| EmptyState {
            message: "No photos yet".to_string(),
            subtitle: if state.is_getting_location {
                "Walk around, a photo is taken every hundred meters or so".to_string()
            } else {
                "Start tracking to collect photos".to_string()
            },
        });

        Self {
            pending_images: state.pending_images(),
            controls: TrackingControls {
                can_start: !state.is_getting_location,
                can_stop: state.is_getting_location,
            },
            rows,
            empty_state,
        }
    }
}

impl From<&Photo> for PhotoRow {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id,
            location: photo.location(),
            image_url: photo.image_url.clone(),
        }
    }
}
