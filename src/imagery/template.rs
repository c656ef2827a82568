//! Image URLs built from a template.
//!
//! Static-map style providers encode the coordinates directly in the image URL,
//! so resolving an image is string substitution of the `{lat}` and `{lon}`
//! placeholders.

use super::ImageService;
use crate::domain::error::{LocationStreamError, Result};
use async_trait::async_trait;

/// Placeholder replaced by the latitude.
pub const LATITUDE_PLACEHOLDER: &str = "{lat}";

/// Placeholder replaced by the longitude.
pub const LONGITUDE_PLACEHOLDER: &str = "{lon}";

/// Image service that fills coordinates into a URL template.
///
/// # Example
///
/// ```rust
/// use locationstream::imagery::TemplateImageService;
///
/// let service = TemplateImageService::new("https://maps.example/static?center={lat},{lon}")?;
/// assert_eq!(
///     service.url_for(10.0, -20.5),
///     "https://maps.example/static?center=10.000000,-20.500000"
/// );
/// # Ok::<(), locationstream::LocationStreamError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateImageService {
    template: String,
}

impl TemplateImageService {
    /// Creates a service for `template`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either placeholder is missing.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        validate_template(&template)?;
        Ok(Self { template })
    }

    /// Builds the image URL for the coordinates.
    #[must_use]
    pub fn url_for(&self, latitude: f64, longitude: f64) -> String {
        self.template
            .replace(LATITUDE_PLACEHOLDER, &format!("{latitude:.6}"))
            .replace(LONGITUDE_PLACEHOLDER, &format!("{longitude:.6}"))
    }
}

/// Checks that `template` carries both coordinate placeholders.
///
/// # Errors
///
/// Returns [`LocationStreamError::Config`] naming the missing placeholder.
pub fn validate_template(template: &str) -> Result<()> {
    for placeholder in [LATITUDE_PLACEHOLDER, LONGITUDE_PLACEHOLDER] {
        if !template.contains(placeholder) {
            return Err(LocationStreamError::Config(format!(
                "image URL template is missing the {placeholder} placeholder"
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl ImageService for TemplateImageService {
    async fn resolve_image_url(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            tracing::debug!(latitude, longitude, "coordinates out of range, no image");
            return Ok(None);
        }
        Ok(Some(self.url_for(latitude, longitude)))
    }
}
