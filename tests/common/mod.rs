//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use locationstream::imagery::ImageService;
use locationstream::storage::PhotoRepository;
use locationstream::{Location, LocationStreamError, Photo, PhotoId, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Repository keeping everything in memory.
#[derive(Default)]
pub struct MemoryRepository {
    photos: Mutex<Vec<Photo>>,
    tracking: AtomicBool,
    last_location: Mutex<Option<Location>>,
    fail_create: AtomicBool,
    create_calls: AtomicUsize,
    persist_calls: AtomicUsize,
    create_delay: Duration,
}

impl MemoryRepository {
    pub fn failing() -> Self {
        let repository = Self::default();
        repository.fail_create.store(true, Ordering::SeqCst);
        repository
    }

    /// Takes `delay` to create each photo.
    pub fn slow(delay: Duration) -> Self {
        Self {
            create_delay: delay,
            ..Self::default()
        }
    }

    pub fn seeded(photos: Vec<Photo>, tracking: bool, last_location: Option<Location>) -> Self {
        let repository = Self::default();
        *repository.photos.lock().unwrap() = photos;
        repository.tracking.store(tracking, Ordering::SeqCst);
        *repository.last_location.lock().unwrap() = last_location;
        repository
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    pub fn tracking(&self) -> bool {
        self.tracking.load(Ordering::SeqCst)
    }

    pub fn photos(&self) -> Vec<Photo> {
        self.photos.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoRepository for MemoryRepository {
    async fn create_photo_for_location(&self, location: Location) -> Result<Option<Photo>> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(LocationStreamError::Storage("disk full".to_string()));
        }
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }

        let mut photos = self.photos.lock().unwrap();
        let id = PhotoId(photos.len() as u64 + 1);
        let photo = Photo::new(id, location);
        photos.push(photo.clone());
        *self.last_location.lock().unwrap() = Some(location);
        Ok(Some(photo))
    }

    async fn persist_photo_with_image(&self, photo: &Photo, image_url: &str) -> Result<Photo> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        let mut photos = self.photos.lock().unwrap();
        let stored = photos
            .iter_mut()
            .find(|stored| stored.id == photo.id)
            .ok_or_else(|| LocationStreamError::Storage(format!("photo not found: {}", photo.id)))?;
        *stored = stored.with_image_url(image_url);
        Ok(stored.clone())
    }

    async fn set_tracking_enabled(&self, enabled: bool) -> Result<()> {
        self.tracking.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    async fn is_tracking_enabled(&self) -> Result<bool> {
        Ok(self.tracking())
    }

    async fn last_location_saved(&self) -> Result<Option<Location>> {
        Ok(*self.last_location.lock().unwrap())
    }

    async fn load_cached_photos(&self) -> Result<Vec<Photo>> {
        Ok(self.photos())
    }
}

/// Image service numbering its answers: the first lookup gets
/// `http://img/1`, the second `http://img/2` and so on.
#[derive(Default)]
pub struct CountingImages {
    lookups: AtomicUsize,
    unavailable: bool,
}

impl CountingImages {
    pub fn unavailable() -> Self {
        Self {
            lookups: AtomicUsize::new(0),
            unavailable: true,
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageService for CountingImages {
    async fn resolve_image_url(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>> {
        let n = self.lookups.fetch_add(1, Ordering::SeqCst) + 1;
        if self.unavailable {
            return Ok(None);
        }
        Ok(Some(format!("http://img/{n}")))
    }
}
