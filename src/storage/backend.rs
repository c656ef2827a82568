//! Photo repository abstraction.
//!
//! The [`PhotoRepository`] trait is the only way the core touches persisted
//! photos. Each method maps directly to a step of an effect chain or to the
//! startup seeding of [`AppState`](crate::AppState).

use crate::domain::error::Result;
use crate::domain::{Location, Photo};
use async_trait::async_trait;

/// Persists photos and the tracking setting.
///
/// Implementations must be safe to call from concurrently running effect
/// chains.
///
/// # Implementations
///
/// - [`JsonPhotoRepository`](crate::storage::JsonPhotoRepository): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use locationstream::storage::{JsonPhotoRepository, PhotoRepository};
/// use locationstream::Location;
/// use std::path::PathBuf;
///
/// # async fn demo() -> locationstream::Result<()> {
/// let repository = JsonPhotoRepository::open(PathBuf::from("/tmp/photos.json")).await?;
/// let photo = repository.create_photo_for_location(Location::new(10.0, 10.0)).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Creates and stores a photo stub for `location`.
    ///
    /// Returns `Ok(None)` when the repository declines to create one.
    ///
    /// # Errors
    ///
    /// Returns an error if the photo cannot be stored.
    async fn create_photo_for_location(&self, location: Location) -> Result<Option<Photo>>;

    /// Stores `image_url` for `photo` and returns the updated copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the photo is unknown or cannot be stored.
    async fn persist_photo_with_image(&self, photo: &Photo, image_url: &str) -> Result<Photo>;

    /// Persists whether location tracking is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be stored.
    async fn set_tracking_enabled(&self, enabled: bool) -> Result<()>;

    /// Returns whether location tracking was last enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be read.
    async fn is_tracking_enabled(&self) -> Result<bool>;

    /// Returns the location of the most recently created photo.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read.
    async fn last_location_saved(&self) -> Result<Option<Location>>;

    /// Returns all stored photos in capture order.
    ///
    /// # Errors
    ///
    /// Returns an error if the photos cannot be read.
    async fn load_cached_photos(&self) -> Result<Vec<Photo>>;
}
