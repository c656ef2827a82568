//! Application state snapshot.
//!
//! [`AppState`] is the single source of truth for the photo list, the tracking
//! flag and the last saved location. The store never edits a snapshot: each
//! dispatched action yields a fresh successor computed by the
//! [reducer](crate::app::reducer), and readers hold an `Arc` to whichever
//! snapshot was current when they looked.

use crate::domain::{Location, Photo, PhotoId};

/// Immutable application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Photos in capture order.
    ///
    /// Grows by appending new photos; an entry is replaced in place when its
    /// image URL is resolved.
    pub photos: Vec<Photo>,

    /// Whether location updates are currently requested.
    pub is_getting_location: bool,

    /// Most recent fix, useful or not.
    ///
    /// Read by the effect stage to decide whether a new fix warrants a photo.
    pub last_location_saved: Option<Location>,
}

impl AppState {
    /// Creates a state seeded with cached content.
    ///
    /// ```rust
    /// use locationstream::AppState;
    ///
    /// let state = AppState::new(vec![], false, None);
    /// assert!(state.photos.is_empty());
    /// assert_eq!(state, AppState::default());
    /// ```
    #[must_use]
    pub const fn new(
        photos: Vec<Photo>,
        is_getting_location: bool,
        last_location_saved: Option<Location>,
    ) -> Self {
        Self {
            photos,
            is_getting_location,
            last_location_saved,
        }
    }

    /// Position of the photo with `id` within [`photos`](Self::photos).
    #[must_use]
    pub fn position_of(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|photo| photo.id == id)
    }

    /// Number of photos still waiting for an image URL.
    #[must_use]
    pub fn pending_images(&self) -> usize {
        self.photos.iter().filter(|photo| !photo.has_image()).count()
    }
}
