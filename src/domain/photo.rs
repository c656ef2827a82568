//! Photo values held in application state.
//!
//! A `Photo` is created without an image and is later replaced by an updated
//! copy once the image service has resolved a URL for its coordinates.

use super::location::Location;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the photo repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u64);

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A photo captured at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
}

impl Photo {
    /// Creates a photo without an image for `location`.
    ///
    /// ```
    /// use locationstream::{Location, Photo, PhotoId};
    ///
    /// let photo = Photo::new(PhotoId(1), Location::new(10.0, 10.0));
    /// assert!(photo.image_url.is_none());
    /// ```
    #[must_use]
    pub const fn new(id: PhotoId, location: Location) -> Self {
        Self {
            id,
            latitude: location.latitude,
            longitude: location.longitude,
            image_url: None,
        }
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }

    /// Returns a copy of this photo carrying `image_url`.
    #[must_use]
    pub fn with_image_url(&self, image_url: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..self.clone()
        }
    }

    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}
