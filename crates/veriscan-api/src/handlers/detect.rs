//! Upload-and-detect handler.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::HttpAppError;
use crate::services::detection::{DetectionService, UploadedFile};
use crate::state::AppState;
use veriscan_core::models::DetectResponse;
use veriscan_core::validation::ValidationError;
use veriscan_core::AppError;

/// `POST /detect`: multipart form with a required `file` part and an
/// optional free-text `user_label` part.
#[tracing::instrument(skip(state, multipart), fields(operation = "detect"))]
pub async fn detect(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DetectResponse>, HttpAppError> {
    let mut upload: Option<UploadedFile> = None;
    let mut user_label: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::InvalidInput(format!("Failed to read upload: {}", e))
                    })?
                    .to_vec();
                upload = Some(UploadedFile {
                    data,
                    filename,
                    content_type,
                });
            }
            Some("user_label") => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read user_label: {}", e))
                })?;
                user_label = Some(text);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or(ValidationError::NoFile)?;

    let service = DetectionService::new(state);
    let record = service.detect(upload, user_label).await?;

    Ok(Json(DetectResponse::from_record(&record)))
}
