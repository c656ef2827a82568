//! Remote image lookup for photo coordinates.
//!
//! The effect pipeline asks an [`ImageService`] for an image URL once a photo
//! has been created, then persists that URL through the photo repository.
//!
//! - `template`: URL template implementation

pub mod template;

pub use template::TemplateImageService;

use crate::domain::error::Result;
use async_trait::async_trait;

/// Resolves an image URL for a pair of coordinates.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Returns an image URL for the coordinates, or `None` when there is no
    /// image for that place.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached.
    async fn resolve_image_url(&self, latitude: f64, longitude: f64) -> Result<Option<String>>;
}
