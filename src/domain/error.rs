//! Error types for the location stream.
//!
//! This module defines the centralized error type [`LocationStreamError`] and a type
//! alias [`Result`] used throughout the crate. Errors raised by collaborators inside
//! the effect pipeline are logged and swallowed there; they never leave
//! [`Store::dispatch`](crate::app::Store::dispatch).

use thiserror::Error;

/// The main error type for location stream operations.
///
/// # Examples
///
/// ```
/// use locationstream::LocationStreamError;
///
/// fn load_photos() -> Result<(), LocationStreamError> {
///     Err(LocationStreamError::Storage("photo cache is corrupt".to_string()))
/// }
///
/// assert!(load_photos().is_err());
/// ```
#[derive(Debug, Error)]
pub enum LocationStreamError {
    /// Photo repository operation failed.
    ///
    /// Occurs when reading from or writing to the photo store fails, or when
    /// the stored data cannot be parsed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The image service could not resolve an image for a location.
    #[error("Image service error: {0}")]
    ImageService(String),

    /// Location permission is missing.
    ///
    /// Raised by a location provider when updates are requested without the
    /// required permission. No fixes will arrive while this persists.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The location provider failed outside of a permission problem.
    #[error("Location provider error: {0}")]
    Location(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for location stream operations.
pub type Result<T> = std::result::Result<T, LocationStreamError>;
