mod common;

use common::{CountingImages, MemoryRepository};
use locationstream::imagery::TemplateImageService;
use locationstream::infrastructure::photos_file;
use locationstream::location::{LocationRequest, LocationUpdates, ReplayLocationProvider};
use locationstream::storage::JsonPhotoRepository;
use locationstream::{
    build_store, load_initial_content, AppState, Config, Location, LocationStreamError, PhotoId,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::runtime::Handle;

fn immediate_request() -> LocationRequest {
    LocationRequest {
        interval: Duration::ZERO,
        fastest_interval: Duration::ZERO,
        ..LocationRequest::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn replayed_walk_is_persisted_and_restored() {
    let dir = tempdir().unwrap();
    let fixes_path = dir.path().join("walk.jsonl");
    std::fs::write(
        &fixes_path,
        "# start at the station\n\
         {\"latitude\": 10.0, \"longitude\": 10.0}\n\
         {\"latitude\": 10.0001, \"longitude\": 10.0001}\n\
         {\"latitude\": 10.01, \"longitude\": 10.01}\n",
    )
    .unwrap();

    let config = Config {
        data_dir: Some(dir.path().join("data")),
        image_url_template: "http://img/{lat}/{lon}".to_string(),
        ..Config::default()
    };
    let repository_path = photos_file(&config.resolved_data_dir());

    let repository = Arc::new(JsonPhotoRepository::open(repository_path.clone()).await.unwrap());
    let images = Arc::new(TemplateImageService::new(config.image_url_template.clone()).unwrap());
    let (store, effects) = build_store(&config, repository.clone(), images, Handle::current());

    // Spaced so each photo is stored before the next fix arrives.
    let request = LocationRequest {
        interval: Duration::from_millis(200),
        fastest_interval: Duration::from_millis(100),
        ..LocationRequest::default()
    };
    let updates = LocationUpdates::new(&store, request);
    let provider = ReplayLocationProvider::from_json_lines(&fixes_path).await.unwrap();
    updates.request_location_updates(provider).await.unwrap();
    updates.finished().await;
    effects.wait_idle().await;
    assert!(store.state().is_getting_location);

    updates.remove_location_updates().await;
    effects.wait_idle().await;

    let state = store.state();
    let urls: Vec<Option<&str>> =
        state.photos.iter().map(|photo| photo.image_url.as_deref()).collect();
    assert_eq!(
        urls,
        vec![
            Some("http://img/10.000000/10.000000"),
            Some("http://img/10.010000/10.010000"),
        ]
    );
    assert!(!state.is_getting_location);
    drop(store);

    let reopened = Arc::new(JsonPhotoRepository::open(repository_path).await.unwrap());
    let (restored, _effects) = build_store(
        &config,
        reopened.clone(),
        Arc::new(CountingImages::default()),
        Handle::current(),
    );
    load_initial_content(&restored, reopened.as_ref()).await.unwrap();

    let restored_state = restored.state();
    assert_eq!(restored_state.photos, state.photos);
    assert!(!restored_state.is_getting_location);
    assert_eq!(
        restored_state.last_location_saved,
        Some(Location::new(10.01, 10.01))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn denied_permission_leaves_tracking_off() {
    let repository = Arc::new(MemoryRepository::default());
    let (store, effects) = build_store(
        &Config::default(),
        repository.clone(),
        Arc::new(CountingImages::default()),
        Handle::current(),
    );

    let updates = LocationUpdates::new(&store, immediate_request());
    let provider =
        ReplayLocationProvider::new(vec![Location::new(10.0, 10.0)]).with_permission(false);
    let result = updates.request_location_updates(provider).await;
    effects.wait_idle().await;

    assert!(matches!(result, Err(LocationStreamError::PermissionDenied(_))));
    assert_eq!(*store.state(), AppState::default());
    assert!(!repository.tracking());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn start_and_stop_are_recorded() {
    let repository = Arc::new(MemoryRepository::default());
    let (store, effects) = build_store(
        &Config::default(),
        repository.clone(),
        Arc::new(CountingImages::default()),
        Handle::current(),
    );
    let updates = LocationUpdates::new(&store, immediate_request());

    updates
        .request_location_updates(ReplayLocationProvider::new(vec![Location::new(1.0, 1.0)]))
        .await
        .unwrap();
    updates.finished().await;
    effects.wait_idle().await;
    assert!(repository.tracking());
    assert_eq!(store.state().photos[0].id, PhotoId(1));

    updates.remove_location_updates().await;
    effects.wait_idle().await;
    assert!(!repository.tracking());
    assert!(!updates.is_requesting().await);
}
