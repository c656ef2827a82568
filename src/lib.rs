//! Locationstream: background location tracking that collects photos.
//!
//! Whenever the device has moved meaningfully, a photo record is captured for
//! the new position and a remote image for that place is attached to it. The
//! crate provides:
//! - A distance filter deciding which fixes are worth a photo
//! - A unidirectional store (actions → middleware → reducer → subscribers)
//! - An effect stage sequencing repository and image lookups per action
//! - A location updates service driving the store from a fix provider
//! - JSON file persistence and a URL-template image service
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Location service (location/)                       │  ← Fix stream
//! │  - Provider request/remove lifecycle                │
//! │  - Fix → NewLocationDetected                        │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Store with serialized dispatch                   │
//! │  - Middleware chain (logging, effects)              │
//! │  - Pure reducer                                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Imagery       │
//! │ (ui/)         │   │ (storage/)    │   │ (imagery/)    │
//! │ - View model  │   │ - JSON I/O    │   │ - URL template│
//! │ - Text render │   │ - Repository  │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory paths (infrastructure/)           │
//! │  - Error types (domain/error)                       │
//! │  - Location, distance filter, photo (domain/)       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - stderr logging                                   │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Store, actions, reducer and middleware
//! - [`domain`]: Core domain types (Location, Photo, errors)
//! - [`imagery`]: Image URL lookup
//! - [`infrastructure`]: Platform paths
//! - [`location`]: Location providers and the updates service
//! - [`observability`]: Tracing setup
//! - [`storage`]: Photo repository
//! - [`ui`]: Photo list view model and rendering
//!
//! # Configuration
//!
//! Read from a TOML file; every key is optional:
//!
//! ```toml
//! data_dir = "~/.local/share/locationstream"
//! min_displacement_meters = 100.0
//! update_interval_ms = 10000
//! fastest_update_interval_ms = 5000
//! priority = "high_accuracy"
//! image_url_template = "https://maps.example/static?center={lat},{lon}"
//! trace_level = "debug"
//! ```
//!
//! # Initialization Flow
//!
//! 1. Load [`Config`] and install tracing
//! 2. Open the photo repository and build the store with [`build_store`]
//! 3. Seed cached photos and the tracking flag with [`load_initial_content`]
//! 4. Request location updates; each fix flows through the store
//! 5. On exit, remove updates and wait for in-flight effects
//!
//! # Example
//!
//! ```rust,no_run
//! use locationstream::imagery::TemplateImageService;
//! use locationstream::location::{LocationRequest, LocationUpdates, ReplayLocationProvider};
//! use locationstream::storage::JsonPhotoRepository;
//! use locationstream::{build_store, load_initial_content, Config, Location};
//! use std::sync::Arc;
//!
//! # async fn run() -> locationstream::Result<()> {
//! let config = Config::default();
//! let repository = Arc::new(JsonPhotoRepository::open("/tmp/photos.json".into()).await?);
//! let images = Arc::new(TemplateImageService::new(config.image_url_template.clone())?);
//!
//! let runtime = tokio::runtime::Handle::current();
//! let (store, effects) = build_store(&config, repository.clone(), images, runtime);
//! load_initial_content(&store, repository.as_ref()).await?;
//!
//! let updates = LocationUpdates::new(&store, LocationRequest::from_config(&config));
//! updates
//!     .request_location_updates(ReplayLocationProvider::new(vec![Location::new(10.0, 10.0)]))
//!     .await?;
//! updates.finished().await;
//! updates.remove_location_updates().await;
//! effects.wait_idle().await;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod imagery;
pub mod infrastructure;
pub mod location;
pub mod observability;
pub mod storage;
pub mod ui;

pub use app::{Action, AppState, EffectMiddleware, Store, StoreHandle, SubscriptionId};
pub use domain::{
    DistanceFilter, Location, LocationStreamError, Photo, PhotoId, Result,
    DEFAULT_MIN_DISPLACEMENT_METERS,
};

use app::{LoggingMiddleware, Middleware};
use imagery::ImageService;
use location::Priority;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage::PhotoRepository;

/// Image URL template used when none is configured.
pub const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://staticmap.openstreetmap.de/staticmap.php?center={lat},{lon}&zoom=16&size=640x360";

/// Application configuration.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory for the photo repository and trace files.
    ///
    /// A leading `~` expands to the home directory. Default: the platform
    /// data directory joined with `locationstream`.
    pub data_dir: Option<PathBuf>,

    /// Minimum displacement between saved fixes. Default: 100 m
    pub min_displacement_meters: f64,

    /// Desired interval between fixes. Default: 10 000 ms
    pub update_interval_ms: u64,

    /// Fastest accepted interval between fixes. Default: half the update interval
    pub fastest_update_interval_ms: Option<u64>,

    /// Requested fix accuracy: `high_accuracy`, `balanced_power_accuracy` or
    /// `low_power`. Default: `high_accuracy`
    pub priority: Priority,

    /// URL with `{lat}` and `{lon}` placeholders.
    pub image_url_template: String,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error` or a full
    /// `EnvFilter` directive. `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            min_displacement_meters: DEFAULT_MIN_DISPLACEMENT_METERS,
            update_interval_ms: 10_000,
            fastest_update_interval_ms: None,
            priority: Priority::HighAccuracy,
            image_url_template: DEFAULT_IMAGE_URL_TEMPLATE.to_string(),
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    ///
    /// ```rust
    /// use locationstream::Config;
    ///
    /// let config = Config::from_toml_str("min_displacement_meters = 250.0")?;
    /// assert_eq!(config.min_displacement_meters, 250.0);
    /// assert_eq!(config.update_interval_ms, 10_000);
    /// # Ok::<(), locationstream::LocationStreamError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LocationStreamError::Config`] for malformed TOML, unknown keys
    /// or values rejected by [`Config::validate`].
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| LocationStreamError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a configuration
    /// error as for [`Config::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`LocationStreamError::Config`] for a zero update interval, a
    /// fastest interval above the update interval, a negative or non-finite
    /// displacement, or an image template missing a placeholder.
    pub fn validate(&self) -> Result<()> {
        if !self.min_displacement_meters.is_finite() || self.min_displacement_meters < 0.0 {
            return Err(LocationStreamError::Config(format!(
                "min_displacement_meters must be a non-negative number, got {}",
                self.min_displacement_meters
            )));
        }

        if self.update_interval_ms == 0 {
            return Err(LocationStreamError::Config(
                "update_interval_ms must be positive".to_string(),
            ));
        }

        if let Some(fastest) = self.fastest_update_interval_ms {
            if fastest == 0 || fastest > self.update_interval_ms {
                return Err(LocationStreamError::Config(format!(
                    "fastest_update_interval_ms must be between 1 and {}, got {fastest}",
                    self.update_interval_ms
                )));
            }
        }

        imagery::template::validate_template(&self.image_url_template)
    }

    /// Data directory with defaults applied and `~` expanded.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.as_ref().map_or_else(infrastructure::get_data_dir, |dir| {
            infrastructure::expand_tilde(&dir.to_string_lossy())
        })
    }

    #[must_use]
    pub const fn distance_filter(&self) -> DistanceFilter {
        DistanceFilter::new(self.min_displacement_meters)
    }
}

/// Builds the store with its middleware chain: logging first, then effects.
///
/// Effects are spawned on `runtime`. The effect stage is returned as well so
/// the caller can wait for in-flight effects before exiting.
pub fn build_store(
    config: &Config,
    repository: Arc<dyn PhotoRepository>,
    images: Arc<dyn ImageService>,
    runtime: tokio::runtime::Handle,
) -> (Store, Arc<EffectMiddleware>) {
    let effects = Arc::new(EffectMiddleware::new(
        repository,
        images,
        config.distance_filter(),
        runtime,
    ));

    let middleware: Vec<Arc<dyn Middleware>> = vec![
        Arc::new(LoggingMiddleware) as Arc<dyn Middleware>,
        Arc::clone(&effects) as Arc<dyn Middleware>,
    ];

    (Store::new(AppState::default(), middleware), effects)
}

/// Seeds the store from the repository's cache.
///
/// Dispatches one `SetInitialContent` carrying the cached photos, the stored
/// tracking flag and the last saved location.
///
/// # Errors
///
/// Returns the repository's error; nothing is dispatched in that case.
pub async fn load_initial_content(store: &Store, repository: &dyn PhotoRepository) -> Result<()> {
    let photos = repository.load_cached_photos().await?;
    let is_updating = repository.is_tracking_enabled().await?;
    let last_location = repository.last_location_saved().await?;

    tracing::info!(
        photo_count = photos.len(),
        is_updating,
        "initial content loaded"
    );

    store.dispatch(Action::SetInitialContent {
        photos,
        is_updating,
        last_location,
    });
    Ok(())
}
