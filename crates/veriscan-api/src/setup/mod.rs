//! Application initialization: database, storage, classifier, routes.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;
use veriscan_core::validation::{UploadValidator, ValidationPolicy};
use veriscan_core::Config;
use veriscan_db::DetectionRepository;
use veriscan_inference::{Classifier, RemoteClassifier, StubClassifier};
use veriscan_storage::UploadStore;

/// Build the application state and router from configuration.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let pool = database::setup_database(&config).await?;

    let store = UploadStore::new(&config.upload_dir, config.allowed_extensions.clone()).await?;

    let classifier: Arc<dyn Classifier> = match &config.inference_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "Using remote inference endpoint");
            Arc::new(RemoteClassifier::new(url.clone())?)
        }
        None => {
            tracing::info!("No inference endpoint configured, using stub classifier");
            Arc::new(StubClassifier::new())
        }
    };

    let validator = UploadValidator::new(
        config.max_upload_size_bytes,
        config.allowed_extensions.clone(),
        ValidationPolicy::Relaxed,
    );

    let state = Arc::new(AppState {
        detections: DetectionRepository::new(pool.clone()),
        pool,
        store,
        classifier,
        validator,
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
