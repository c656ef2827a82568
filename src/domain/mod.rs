//! Domain layer: value types and the distance filter.
//!
//! Everything here is free of I/O and runtime concerns.
//!
//! - [`error`]: Error types and result aliases
//! - [`location`]: Geographic fixes and the "useful fix" decision
//! - [`photo`]: Photo values bound into application state

pub mod error;
pub mod location;
pub mod photo;

pub use error::{LocationStreamError, Result};
pub use location::{DistanceFilter, Location, DEFAULT_MIN_DISPLACEMENT_METERS};
pub use photo::{Photo, PhotoId};
