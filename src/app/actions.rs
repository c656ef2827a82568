//! Actions describing state transitions and triggering events.
//!
//! This module defines the [`Action`] type, the closed set of one-shot messages
//! accepted by [`Store::dispatch`](crate::app::Store::dispatch). Every action flows
//! through the middleware chain, where the effect stage may start asynchronous
//! work, and then reaches the reducer.
//!
//! # Example
//!
//! ```rust
//! use locationstream::{Action, Location};
//!
//! let action = Action::NewLocationDetected {
//!     location: Location::new(10.0, 10.0),
//! };
//! assert_eq!(action.kind(), "NewLocationDetected");
//! ```

use crate::domain::{Location, Photo};

/// Messages accepted by the store.
///
/// Follow-up actions produced by the effect stage carry the photo they refer to,
/// so they apply correctly no matter in which order concurrent effect chains
/// complete.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replaces the whole state with cached content.
    ///
    /// Dispatched once at startup after the photo repository has been read.
    SetInitialContent {
        /// Photos loaded from the repository, in capture order.
        photos: Vec<Photo>,
        /// Whether location tracking was enabled when the app last ran.
        is_updating: bool,
        /// Last location the repository saved a photo for.
        last_location: Option<Location>,
    },

    /// A new fix arrived from the location provider.
    ///
    /// Always recorded as the last saved location. The effect stage creates a
    /// photo only when the fix is far enough from the previous one.
    NewLocationDetected {
        location: Location,
    },

    /// The repository created a photo for a useful fix.
    AddNewPhoto {
        photo: Photo,
        /// The fix that produced the photo.
        location: Location,
    },

    /// A photo acquired its image URL and replaces the stored entry.
    UpdatePhotoWithImage {
        photo: Photo,
    },

    /// Location tracking was switched on or off.
    StartStopUpdating {
        is_updating: bool,
    },
}

impl Action {
    /// Variant name, used as a structured logging field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetInitialContent { .. } => "SetInitialContent",
            Self::NewLocationDetected { .. } => "NewLocationDetected",
            Self::AddNewPhoto { .. } => "AddNewPhoto",
            Self::UpdatePhotoWithImage { .. } => "UpdatePhotoWithImage",
            Self::StartStopUpdating { .. } => "StartStopUpdating",
        }
    }
}
