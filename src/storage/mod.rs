//! Storage layer for photos and tracking settings.
//!
//! This module defines the [`PhotoRepository`] boundary used by the effect
//! pipeline and at startup, plus a JSON file implementation.
//!
//! # Modules
//!
//! - `backend`: Repository trait abstraction
//! - `json`: JSON file-based repository with atomic writes
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::PhotoRepository;
pub use json::JsonPhotoRepository;
pub use models::PhotoRecord;
