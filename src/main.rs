//! Command-line entry point.
//!
//! Replays a recorded fix file through the pipeline and prints the photo list
//! after every state change:
//!
//! ```text
//! locationstream --fixes walk.jsonl [--config locationstream.toml] [--data-dir DIR]
//! ```
//!
//! # Lifecycle
//!
//! 1. **Load**: Parse arguments and configuration, initialize tracing
//! 2. **Open**: Open the photo repository in the data directory
//! 3. **Seed**: Restore cached photos and the tracking flag
//! 4. **Track**: Request updates from the replay provider
//! 5. **Stop**: When the fixes run out or on Ctrl-C, remove updates and wait
//!    for in-flight effects to finish

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use locationstream::imagery::TemplateImageService;
use locationstream::infrastructure::photos_file;
use locationstream::location::{LocationRequest, LocationUpdates, ReplayLocationProvider};
use locationstream::observability::init_tracing;
use locationstream::storage::JsonPhotoRepository;
use locationstream::ui::{render, PhotoListViewModel};
use locationstream::{build_store, load_initial_content, AppState, Config, Result};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines file of recorded fixes to replay.
    #[arg(short, long)]
    fixes: PathBuf,

    /// Overrides the configured data directory.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = Some(data_dir);
    }

    init_tracing(&config);
    tracing::info!("locationstream starting up");

    let data_dir = config.resolved_data_dir();
    let repository = Arc::new(JsonPhotoRepository::open(photos_file(&data_dir)).await?);
    tracing::info!(path = ?repository.path(), "photo repository ready");
    let images = Arc::new(TemplateImageService::new(config.image_url_template.clone())?);

    let (store, effects) = build_store(
        &config,
        repository.clone(),
        images,
        tokio::runtime::Handle::current(),
    );
    store.subscribe(|state: &AppState| {
        print!("{}", render(&PhotoListViewModel::from_state(state)));
    });
    load_initial_content(&store, repository.as_ref()).await?;

    let provider = ReplayLocationProvider::from_json_lines(&args.fixes).await?;
    tracing::info!(fixes = provider.remaining(), "replaying recorded fixes");

    let updates = LocationUpdates::new(&store, LocationRequest::from_config(&config));
    updates.request_location_updates(provider).await?;

    tokio::select! {
        () = updates.finished() => tracing::info!("all fixes replayed"),
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("interrupted"),
            Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl-C"),
        },
    }

    updates.remove_location_updates().await;
    effects.wait_idle().await;

    let state = store.state();
    tracing::info!(
        photos = state.photos.len(),
        pending_images = state.pending_images(),
        "shutdown complete"
    );
    Ok(())
}
