//! Detection record models and API response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default tag recorded when the inference details carry no version of
/// their own.
pub const DEFAULT_MODEL_VERSION: &str = "v1.0";

/// One analyzed upload, as persisted. Append-only: rows are never updated
/// after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DetectionRecord {
    pub id: i64,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub is_fake: bool,
    pub confidence_score: f64,
    pub processing_time: f64,
    pub user_is_fake: Option<bool>,
    pub model_version: String,
    pub analysis_details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a detection record. `id` and `created_at` are
/// assigned by the database.
#[derive(Debug, Clone)]
pub struct NewDetection {
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub is_fake: bool,
    pub confidence_score: f64,
    pub processing_time: f64,
    pub user_is_fake: Option<bool>,
    pub model_version: String,
    pub analysis_details: Option<String>,
}

/// Compact row for the history listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DetectionSummary {
    pub id: i64,
    pub filename: String,
    pub is_fake: bool,
    #[serde(rename = "confidence")]
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub results: Vec<DetectionSummary>,
    pub total: i64,
}

/// Response body for a completed detection.
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub file_id: i64,
    pub filename: String,
    pub is_fake: bool,
    pub confidence: f64,
    pub processing_time: f64,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

impl DetectResponse {
    pub fn from_record(record: &DetectionRecord) -> Self {
        Self {
            file_id: record.id,
            filename: record.filename.clone(),
            is_fake: record.is_fake,
            confidence: record.confidence_score,
            processing_time: (record.processing_time * 1000.0).round() / 1000.0,
            created_at: record.created_at,
            message: format!(
                "Image analyzed with {:.1}% confidence",
                record.confidence_score * 100.0
            ),
        }
    }
}

const PLACEHOLDER_NAMES: &[&str] = &["blob", "image", "unknown", "file"];

/// Resolve the display filename for a record. Placeholder names that
/// mobile browsers substitute for camera captures are replaced with a
/// generated name so the history stays meaningful.
pub fn resolve_display_filename(
    declared: Option<&str>,
    extension: &str,
    now: DateTime<Utc>,
) -> String {
    match declared {
        Some(name) if !needs_fallback(name) => name.to_string(),
        _ => format!(
            "uploaded_image_{}.{}",
            now.format("%Y%m%d_%H%M%S"),
            extension
        ),
    }
}

fn needs_fallback(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower.is_empty()
        || PLACEHOLDER_NAMES.contains(&lower.as_str())
        || lower.starts_with("blob")
}

/// Map the optional free-text user label to the tri-state stored flag:
/// absent stays null, a case-insensitive "fake" is true, anything else is
/// false.
pub fn user_label_to_flag(label: Option<&str>) -> Option<bool> {
    label.map(|l| l.trim().eq_ignore_ascii_case("fake"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_declared_filename_is_kept() {
        assert_eq!(
            resolve_display_filename(Some("holiday.jpg"), "jpg", fixed_now()),
            "holiday.jpg"
        );
    }

    #[test]
    fn test_placeholder_names_get_fallback() {
        for name in ["", "blob", "image", "unknown", "file", "blob:xyz", "Blob"] {
            let resolved = resolve_display_filename(Some(name), "png", fixed_now());
            assert_eq!(
                resolved, "uploaded_image_20260314_092653.png",
                "placeholder {:?} not replaced",
                name
            );
        }
    }

    #[test]
    fn test_absent_filename_gets_fallback() {
        assert_eq!(
            resolve_display_filename(None, "jpg", fixed_now()),
            "uploaded_image_20260314_092653.jpg"
        );
    }

    #[test]
    fn test_user_label_mapping() {
        assert_eq!(user_label_to_flag(Some("fake")), Some(true));
        assert_eq!(user_label_to_flag(Some("Fake")), Some(true));
        assert_eq!(user_label_to_flag(Some("FAKE")), Some(true));
        assert_eq!(user_label_to_flag(Some("real")), Some(false));
        assert_eq!(user_label_to_flag(Some("")), Some(false));
        assert_eq!(user_label_to_flag(None), None);
    }

    #[test]
    fn test_detect_response_rounds_processing_time() {
        let record = DetectionRecord {
            id: 7,
            filename: "a.jpg".to_string(),
            file_path: "uploads/x.jpg".to_string(),
            file_size: 2048,
            mime_type: "image/jpeg".to_string(),
            is_fake: true,
            confidence_score: 0.75,
            processing_time: 0.123456,
            user_is_fake: None,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            analysis_details: None,
            created_at: fixed_now(),
        };
        let response = DetectResponse::from_record(&record);
        assert_eq!(response.file_id, 7);
        assert_eq!(response.processing_time, 0.123);
        assert_eq!(response.message, "Image analyzed with 75.0% confidence");
    }
}
