//! Storage record models for the persistence layer.
//!
//! Records carry storage-only fields (creation time) and convert to and from
//! the domain [`Photo`] at the repository boundary.

use crate::domain::{Location, Photo, PhotoId};
use serde::{Deserialize, Serialize};

/// Represents a photo record in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Identifier assigned on creation, increasing with capture order.
    pub id: PhotoId,

    pub latitude: f64,

    pub longitude: f64,

    /// Remote image resolved for the coordinates, `None` until resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Unix timestamp when the photo was captured.
    pub created_at: i64,
}

impl PhotoRecord {
    /// Creates a record for a new capture at `location`, stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use locationstream::storage::PhotoRecord;
    /// use locationstream::{Location, PhotoId};
    ///
    /// let record = PhotoRecord::new(PhotoId(1), Location::new(10.0, 10.0));
    /// assert!(record.image_url.is_none());
    /// assert!(record.created_at > 0);
    /// ```
    #[must_use]
    pub fn new(id: PhotoId, location: Location) -> Self {
        Self {
            id,
            latitude: location.latitude,
            longitude: location.longitude,
            image_url: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    #[must_use]
    pub fn to_photo(&self) -> Photo {
        Photo {
            id: self.id,
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_url.clone(),
        }
    }
}
