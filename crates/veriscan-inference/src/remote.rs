use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{Classifier, Verdict};

/// Version tag recorded for verdicts produced by the remote endpoint.
const REMOTE_MODEL_VERSION: &str = "clip.MVP.v1.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delegates classification to an external prediction endpoint.
///
/// The stored file is resubmitted as a multipart upload to
/// `{base_url}/predict`. Connection failures, non-200 responses, and
/// malformed bodies all degrade to a well-formed failure verdict; the
/// caller never sees an error.
pub struct RemoteClassifier {
    http_client: reqwest::Client,
    base_url: String,
}

impl RemoteClassifier {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client for inference endpoint")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn predict(&self, image_path: &Path) -> Result<Verdict, String> {
        let data = tokio::fs::read(image_path)
            .await
            .map_err(|e| format!("could not read {}: {}", image_path.display(), e))?;

        let filename = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.jpg")
            .to_string();

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename)
            .mime_str("image/jpeg")
            .map_err(|e| format!("invalid upload part: {}", e))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}/predict", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("could not connect to prediction endpoint: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "prediction endpoint returned status {}",
                status.as_u16()
            ));
        }

        let body: PredictionResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed prediction response: {}", e))?;

        Ok(verdict_from_prediction(body))
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, image_path: &Path) -> Verdict {
        match self.predict(image_path).await {
            Ok(verdict) => verdict,
            Err(reason) => {
                tracing::warn!(
                    path = %image_path.display(),
                    reason = %reason,
                    "Remote classification degraded"
                );
                Verdict::degraded(reason)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    prediction: Prediction,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    is_fake: bool,
    fake_probability: f64,
    #[serde(default)]
    label: Option<String>,
}

fn verdict_from_prediction(response: PredictionResponse) -> Verdict {
    let prediction = response.prediction;

    let details = json!({
        "model_version": REMOTE_MODEL_VERSION,
        "analysis_method": "remote inference",
        "label": prediction.label,
        "fake_probability": prediction.fake_probability,
    });

    Verdict {
        is_fake: prediction.is_fake,
        // The endpoint's fake-probability doubles as the recorded
        // confidence.
        confidence: prediction.fake_probability.clamp(0.0, 1.0),
        details: details.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_version_from_details;

    #[test]
    fn test_verdict_from_prediction_maps_fields() {
        let body = r#"{
            "prediction": {
                "label": "fake",
                "is_fake": true,
                "fake_probability": 0.93,
                "real_probability": 0.07,
                "confidence": 93.0
            },
            "file_info": {"filename": "a.jpg", "content_type": "image/jpeg", "size": 2048}
        }"#;
        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        let verdict = verdict_from_prediction(response);

        assert!(verdict.is_fake);
        assert_eq!(verdict.confidence, 0.93);
        assert_eq!(
            model_version_from_details(&verdict.details),
            Some(REMOTE_MODEL_VERSION.to_string())
        );
    }

    #[test]
    fn test_verdict_clamps_out_of_range_probability() {
        let response = PredictionResponse {
            prediction: Prediction {
                is_fake: true,
                fake_probability: 1.7,
                label: None,
            },
        };
        assert_eq!(verdict_from_prediction(response).confidence, 1.0);
    }

    #[test]
    fn test_status_degradation_carries_status_code() {
        let verdict = Verdict::degraded("prediction endpoint returned status 503");
        assert!(!verdict.is_fake);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.details.contains("503"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades() {
        let classifier = RemoteClassifier::new("http://127.0.0.1:1").unwrap();
        let dir = std::env::temp_dir();
        let path = dir.join("veriscan-remote-test.jpg");
        tokio::fs::write(&path, b"not really a jpeg").await.unwrap();

        let verdict = classifier.classify(&path).await;

        assert!(!verdict.is_fake);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.details.starts_with("Error during prediction:"));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
