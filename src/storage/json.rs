//! JSON file-based photo repository.
//!
//! This module provides a simple, human-readable repository using JSON
//! serialization. Every mutation is written through immediately using an atomic
//! write (write-to-temp + rename), so the file is never left half-written.
//!
//! # Performance Characteristics
//!
//! - **Read**: served from memory, loaded once on open
//! - **Write**: O(n), serializes and writes the entire dataset
//! - **Best for**: a few thousand photos, one write per effect step

use crate::domain::error::{LocationStreamError, Result};
use crate::domain::{Location, Photo, PhotoId};
use crate::storage::backend::PhotoRepository;
use crate::storage::models::PhotoRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Current on-disk format version.
const STORAGE_VERSION: u32 = 1;

/// JSON storage container format.
///
/// ```json
/// {
///   "version": 1,
///   "last_id": 2,
///   "requesting_location": true,
///   "last_location": { "latitude": 10.0, "longitude": 10.0 },
///   "photos": [
///     { "id": 1, "latitude": 10.0, "longitude": 10.0, "image_url": "http://img/1", "created_at": 1700000000 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    /// Highest id handed out so far; ids are never reused.
    #[serde(default)]
    last_id: u64,

    #[serde(default)]
    requesting_location: bool,

    #[serde(default)]
    last_location: Option<Location>,

    /// Photos in capture order.
    #[serde(default)]
    photos: Vec<PhotoRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            last_id: 0,
            requesting_location: false,
            last_location: None,
            photos: Vec::new(),
        }
    }
}

/// JSON file photo repository.
///
/// The whole dataset is kept in memory behind an async mutex; the lock is held
/// across the file write so concurrent effect chains persist in a consistent
/// order. Changes are made to a copy that replaces the in-memory data only once
/// it is on disk, so a failed write leaves both unchanged.
pub struct JsonPhotoRepository {
    file_path: PathBuf,
    data: Mutex<StorageData>,
}

impl JsonPhotoRepository {
    /// Opens the repository at `file_path`, creating parent directories.
    ///
    /// A missing file yields an empty repository.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but contains invalid JSON
    /// - The file cannot be read
    pub async fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON photo repository");

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = if tokio::fs::try_exists(&file_path).await? {
            Self::load_from_file(&file_path).await?
        } else {
            tracing::debug!("initializing new empty repository");
            StorageData::default()
        };

        tracing::debug!(
            photo_count = data.photos.len(),
            last_id = data.last_id,
            "photo repository opened"
        );

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = tokio::fs::read_to_string(path).await?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| LocationStreamError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > STORAGE_VERSION {
            return Err(LocationStreamError::Storage(format!(
                "unsupported storage version {} (expected at most {STORAGE_VERSION})",
                data.version
            )));
        }

        Ok(data)
    }

    async fn save(&self, data: &StorageData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| LocationStreamError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.file_path).await?;

        tracing::trace!(path = ?self.file_path, "photo repository saved");
        Ok(())
    }
}

#[async_trait]
impl PhotoRepository for JsonPhotoRepository {
    async fn create_photo_for_location(&self, location: Location) -> Result<Option<Photo>> {
        let mut data = self.data.lock().await;

        let id = PhotoId(data.last_id.saturating_add(1));
        let record = PhotoRecord::new(id, location);
        let photo = record.to_photo();

        let mut next = data.clone();
        next.last_id = id.0;
        next.last_location = Some(location);
        next.photos.push(record);
        self.save(&next).await?;
        *data = next;

        tracing::debug!(photo_id = %id, location = %location, "photo created");
        Ok(Some(photo))
    }

    async fn persist_photo_with_image(&self, photo: &Photo, image_url: &str) -> Result<Photo> {
        let mut data = self.data.lock().await;

        let mut next = data.clone();
        let record = next
            .photos
            .iter_mut()
            .find(|record| record.id == photo.id)
            .ok_or_else(|| LocationStreamError::Storage(format!("photo not found: {}", photo.id)))?;
        record.image_url = Some(image_url.to_string());
        let updated = record.to_photo();
        self.save(&next).await?;
        *data = next;

        tracing::debug!(photo_id = %photo.id, "photo image stored");
        Ok(updated)
    }

    async fn set_tracking_enabled(&self, enabled: bool) -> Result<()> {
        let mut data = self.data.lock().await;
        if data.requesting_location == enabled {
            return Ok(());
        }

        let mut next = data.clone();
        next.requesting_location = enabled;
        self.save(&next).await?;
        *data = next;

        tracing::debug!(enabled = enabled, "tracking setting stored");
        Ok(())
    }

    async fn is_tracking_enabled(&self) -> Result<bool> {
        Ok(self.data.lock().await.requesting_location)
    }

    async fn last_location_saved(&self) -> Result<Option<Location>> {
        Ok(self.data.lock().await.last_location)
    }

    async fn load_cached_photos(&self) -> Result<Vec<Photo>> {
        let data = self.data.lock().await;
        let photos: Vec<Photo> = data.photos.iter().map(PhotoRecord::to_photo).collect();

        tracing::debug!(count = photos.len(), "cached photos loaded");
        Ok(photos)
    }
}

impl std::fmt::Debug for JsonPhotoRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonPhotoRepository")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn ids_increase_and_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("photos.json");

        let repository = JsonPhotoRepository::open(path.clone()).await.unwrap();
        let first = repository
            .create_photo_for_location(Location::new(10.0, 10.0))
            .await
            .unwrap()
            .unwrap();
        let second = repository
            .create_photo_for_location(Location::new(11.0, 11.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.id, PhotoId(1));
        assert_eq!(second.id, PhotoId(2));
        drop(repository);

        let reopened = JsonPhotoRepository::open(path).await.unwrap();
        let third = reopened
            .create_photo_for_location(Location::new(12.0, 12.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(third.id, PhotoId(3));
        assert_eq!(
            reopened.last_location_saved().await.unwrap(),
            Some(Location::new(12.0, 12.0))
        );
        assert_eq!(reopened.load_cached_photos().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn image_url_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photos.json");
        let repository = JsonPhotoRepository::open(path.clone()).await.unwrap();

        let photo = repository
            .create_photo_for_location(Location::new(1.0, 2.0))
            .await
            .unwrap()
            .unwrap();
        let updated = repository
            .persist_photo_with_image(&photo, "http://img/1")
            .await
            .unwrap();
        assert_eq!(updated, photo.with_image_url("http://img/1"));

        let reopened = JsonPhotoRepository::open(path).await.unwrap();
        assert_eq!(reopened.load_cached_photos().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn unknown_photo_cannot_receive_image() {
        let dir = tempdir().unwrap();
        let repository = JsonPhotoRepository::open(dir.path().join("photos.json"))
            .await
            .unwrap();

        let stranger = Photo::new(PhotoId(99), Location::new(0.0, 0.0));
        let result = repository.persist_photo_with_image(&stranger, "http://img/99").await;
        assert!(matches!(result, Err(LocationStreamError::Storage(_))));
    }

    #[tokio::test]
    async fn tracking_flag_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photos.json");
        let repository = JsonPhotoRepository::open(path.clone()).await.unwrap();
        assert!(!repository.is_tracking_enabled().await.unwrap());

        repository.set_tracking_enabled(true).await.unwrap();
        drop(repository);

        let reopened = JsonPhotoRepository::open(path).await.unwrap();
        assert!(reopened.is_tracking_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photos.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonPhotoRepository::open(path).await;
        assert!(matches!(result, Err(LocationStreamError::Storage(_))));
    }

    #[tokio::test]
    async fn failed_write_leaves_data_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photos.json");
        let repository = JsonPhotoRepository::open(path.clone()).await.unwrap();
        let first = repository
            .create_photo_for_location(Location::new(0.0, 0.0))
            .await
            .unwrap()
            .unwrap();

        // A directory in place of the temporary file makes every write fail.
        let blocker = dir.path().join("photos.tmp");
        std::fs::create_dir(&blocker).unwrap();
        assert!(repository
            .create_photo_for_location(Location::new(1.0, 1.0))
            .await
            .is_err());
        assert!(repository.set_tracking_enabled(true).await.is_err());
        assert!(repository
            .persist_photo_with_image(&first, "http://img/1")
            .await
            .is_err());
        std::fs::remove_dir(&blocker).unwrap();

        assert_eq!(repository.load_cached_photos().await.unwrap(), vec![first]);
        assert_eq!(
            repository.last_location_saved().await.unwrap(),
            Some(Location::new(0.0, 0.0))
        );
        assert!(!repository.is_tracking_enabled().await.unwrap());

        repository.set_tracking_enabled(true).await.unwrap();
        drop(repository);

        let reopened = JsonPhotoRepository::open(path).await.unwrap();
        assert!(reopened.is_tracking_enabled().await.unwrap());
        assert_eq!(reopened.load_cached_photos().await.unwrap().len(), 1);
        let next = reopened
            .create_photo_for_location(Location::new(2.0, 2.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.id, PhotoId(2));
    }
}
