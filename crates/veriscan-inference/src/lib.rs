//! Classifier contract and implementations.
//!
//! The pipeline consumes classification through the [`Classifier`] trait
//! and always receives a structurally valid [`Verdict`]: implementations
//! degrade internal failures to a low-confidence negative outcome instead
//! of returning errors.

mod remote;
mod stub;

use std::path::Path;

use async_trait::async_trait;

pub use remote::RemoteClassifier;
pub use stub::StubClassifier;

use veriscan_core::models::DEFAULT_MODEL_VERSION;

/// Outcome of one classification: the fake/real call, the confidence in
/// [0.0, 1.0], and a serialized details payload.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub is_fake: bool,
    pub confidence: f64,
    pub details: String,
}

impl Verdict {
    /// Well-formed failure outcome substituted when classification itself
    /// fails.
    pub fn degraded(reason: impl std::fmt::Display) -> Self {
        Verdict {
            is_fake: false,
            confidence: 0.0,
            details: format!("Error during prediction: {}", reason),
        }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the image at `image_path`. Infallible by contract; see the
    /// crate docs.
    async fn classify(&self, image_path: &Path) -> Verdict;
}

/// Extract the model version tag embedded in a details payload.
///
/// The payload is only trusted as strict JSON; anything else falls back to
/// the default tag at the call site.
pub fn model_version_from_details(details: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(details)
        .ok()?
        .get("model_version")?
        .as_str()
        .map(|s| s.to_string())
}

/// Resolve the model version for a record from its details payload.
pub fn resolve_model_version(details: &str) -> String {
    model_version_from_details(details).unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string())
}
