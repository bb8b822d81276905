//! Application state shared by all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use veriscan_core::validation::UploadValidator;
use veriscan_core::Config;
use veriscan_db::DetectionRepository;
use veriscan_inference::Classifier;
use veriscan_storage::UploadStore;

/// Shared per-process state. The classifier is injected here at startup so
/// tests can substitute a deterministic implementation.
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub detections: DetectionRepository,
    pub store: UploadStore,
    pub classifier: Arc<dyn Classifier>,
    pub validator: UploadValidator,
}
