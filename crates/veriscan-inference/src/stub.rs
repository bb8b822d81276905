use std::path::Path;

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;

use crate::{Classifier, Verdict};

/// Placeholder classifier used when no inference endpoint is configured.
///
/// Produces a random fake-probability; the verdict still satisfies the
/// classifier contract (confidence in [0, 1], parseable details).
#[derive(Debug, Default, Clone)]
pub struct StubClassifier;

impl StubClassifier {
    pub fn new() -> Self {
        StubClassifier
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, image_path: &Path) -> Verdict {
        let fake_probability: f64 = rand::rng().random_range(0.1..0.9);
        let is_fake = fake_probability > 0.5;
        let confidence = if is_fake {
            fake_probability
        } else {
            1.0 - fake_probability
        };

        tracing::debug!(
            path = %image_path.display(),
            fake_probability,
            "Stub classification"
        );

        let details = json!({
            "model_version": "v1.0",
            "analysis_method": "CNN-based detection",
            "features_analyzed": ["texture_patterns", "compression_artifacts", "color_distribution"],
            "processing_notes": "placeholder verdict; no model loaded",
        });

        Verdict {
            is_fake,
            confidence,
            details: details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_version_from_details;

    #[tokio::test]
    async fn test_stub_verdict_satisfies_contract() {
        let classifier = StubClassifier::new();
        for _ in 0..32 {
            let verdict = classifier.classify(Path::new("uploads/sample.jpg")).await;
            assert!(verdict.confidence >= 0.5 && verdict.confidence <= 1.0);
            assert_eq!(
                model_version_from_details(&verdict.details),
                Some("v1.0".to_string())
            );
        }
    }
}
