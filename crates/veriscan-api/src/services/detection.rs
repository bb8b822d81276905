//! The upload intake pipeline: validate, store, classify, record.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::state::AppState;
use veriscan_core::models::{
    resolve_display_filename, user_label_to_flag, DetectionRecord, NewDetection,
};
use veriscan_core::AppError;
use veriscan_inference::resolve_model_version;
use veriscan_storage::UploadStore;

/// Raw upload as extracted from the multipart form.
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

/// Orchestrates one detection request. Each invocation runs its steps
/// sequentially and shares no mutable state with other requests; the
/// store's unique-per-request filenames make the upload directory safe
/// under concurrency.
pub struct DetectionService {
    state: Arc<AppState>,
}

impl DetectionService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn detect(
        &self,
        upload: UploadedFile,
        user_label: Option<String>,
    ) -> Result<DetectionRecord, AppError> {
        self.state.validator.validate(
            upload.data.len(),
            upload.content_type.as_deref(),
            upload.filename.as_deref(),
        )?;

        let start = Instant::now();

        let stored = self
            .state
            .store
            .store(
                &upload.data,
                upload.filename.as_deref(),
                upload.content_type.as_deref(),
            )
            .await?;

        // Infallible by contract: failures arrive as a degraded verdict.
        let verdict = self.state.classifier.classify(&stored.path).await;

        let processing_time = start.elapsed().as_secs_f64();

        let new = NewDetection {
            filename: resolve_display_filename(
                upload.filename.as_deref(),
                &stored.extension,
                Utc::now(),
            ),
            file_path: stored.path.display().to_string(),
            file_size: upload.data.len() as i64,
            mime_type: upload
                .content_type
                .unwrap_or_else(|| "unknown".to_string()),
            is_fake: verdict.is_fake,
            confidence_score: verdict.confidence,
            processing_time,
            user_is_fake: user_label_to_flag(user_label.as_deref()),
            model_version: resolve_model_version(&verdict.details),
            analysis_details: Some(verdict.details),
        };

        let record = match self.state.detections.insert(new).await {
            Ok(record) => record,
            Err(e) => {
                schedule_cleanup(self.state.store.clone(), stored.path.clone());
                return Err(e);
            }
        };

        tracing::info!(
            detection_id = record.id,
            is_fake = record.is_fake,
            confidence = record.confidence_score,
            model_version = %record.model_version,
            "Detection recorded"
        );

        // Retention is the default; deletion only when configured.
        if self.state.config.cleanup_after_detect {
            schedule_cleanup(self.state.store.clone(), stored.path);
        }

        Ok(record)
    }
}

/// Best-effort deferred cleanup: never blocks the response, never retried;
/// the store logs any failure.
fn schedule_cleanup(store: UploadStore, path: PathBuf) {
    tokio::spawn(async move {
        store.delete(&path).await;
    });
}
