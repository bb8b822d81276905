//! Upload validation: size ceiling, MIME allow-list, and extension policy.
//!
//! Pure predicate over declared upload metadata; the error message is
//! returned to the client verbatim.

use thiserror::Error;

/// Fixed MIME allow-list for image uploads.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
];

/// Extension handling policy.
///
/// `Strict` always rejects an extension outside the allow-list. `Relaxed`
/// tolerates it when the filename is a known mobile-browser placeholder
/// ("blob", "image") or the declared MIME type already passed the
/// allow-list check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    Strict,
    Relaxed,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No file provided")]
    NoFile,

    #[error("File size ({actual_mb:.1}MB) exceeds maximum allowed size ({max_mb:.1}MB)")]
    FileTooLarge { actual_mb: f64, max_mb: f64 },

    #[error("MIME type '{0}' not allowed")]
    MimeNotAllowed(String),

    #[error("File type '.{extension}' not allowed. Allowed types: {allowed}")]
    ExtensionNotAllowed { extension: String, allowed: String },
}

/// Validates declared upload metadata against configured limits.
pub struct UploadValidator {
    max_size: usize,
    allowed_extensions: Vec<String>,
    policy: ValidationPolicy,
}

impl UploadValidator {
    pub fn new(max_size: usize, allowed_extensions: Vec<String>, policy: ValidationPolicy) -> Self {
        Self {
            max_size,
            allowed_extensions,
            policy,
        }
    }

    /// Validate a declared upload. Rules apply in a fixed order; the first
    /// failing rule wins.
    pub fn validate(
        &self,
        size: usize,
        content_type: Option<&str>,
        filename: Option<&str>,
    ) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::NoFile);
        }

        if size > self.max_size {
            const MIB: f64 = 1024.0 * 1024.0;
            return Err(ValidationError::FileTooLarge {
                actual_mb: size as f64 / MIB,
                max_mb: self.max_size as f64 / MIB,
            });
        }

        let mime_ok = match content_type {
            Some(ct) => {
                let normalized = ct.to_lowercase();
                if !ALLOWED_MIME_TYPES.contains(&normalized.as_str()) {
                    return Err(ValidationError::MimeNotAllowed(ct.to_string()));
                }
                true
            }
            None => false,
        };

        if let Some(name) = filename {
            let extension = name
                .rsplit('.')
                .next()
                .unwrap_or_default()
                .to_lowercase();
            if !self.allowed_extensions.contains(&extension) {
                let tolerated = self.policy == ValidationPolicy::Relaxed
                    && (is_placeholder_name(name) || mime_ok);
                if !tolerated {
                    return Err(ValidationError::ExtensionNotAllowed {
                        extension,
                        allowed: self.allowed_extensions.join(", "),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Filenames mobile browsers substitute for camera captures.
pub fn is_placeholder_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower == "image" || lower.starts_with("blob")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(policy: ValidationPolicy) -> UploadValidator {
        UploadValidator::new(
            10 * 1024 * 1024,
            vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            policy,
        )
    }

    #[test]
    fn test_empty_payload_rejected() {
        let v = validator(ValidationPolicy::Relaxed);
        assert!(matches!(
            v.validate(0, Some("image/jpeg"), Some("a.jpg")),
            Err(ValidationError::NoFile)
        ));
    }

    #[test]
    fn test_oversize_message_cites_both_values_in_mib() {
        let v = validator(ValidationPolicy::Relaxed);
        let err = v
            .validate(12 * 1024 * 1024, Some("image/jpeg"), Some("a.jpg"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("12.0MB"), "{}", msg);
        assert!(msg.contains("10.0MB"), "{}", msg);
    }

    #[test]
    fn test_mime_outside_allow_list_rejected() {
        let v = validator(ValidationPolicy::Relaxed);
        let err = v.validate(1024, Some("text/plain"), Some("a.jpg")).unwrap_err();
        assert!(matches!(err, ValidationError::MimeNotAllowed(_)));
        assert!(err.to_string().contains("text/plain"));
    }

    #[test]
    fn test_mime_check_is_case_insensitive() {
        let v = validator(ValidationPolicy::Relaxed);
        assert!(v.validate(1024, Some("IMAGE/JPEG"), Some("a.jpg")).is_ok());
    }

    #[test]
    fn test_strict_rejects_unknown_extension() {
        let v = validator(ValidationPolicy::Strict);
        assert!(matches!(
            v.validate(1024, Some("image/jpeg"), Some("a.tiff")),
            Err(ValidationError::ExtensionNotAllowed { .. })
        ));
    }

    #[test]
    fn test_relaxed_tolerates_unknown_extension_when_mime_passed() {
        let v = validator(ValidationPolicy::Relaxed);
        assert!(v.validate(1024, Some("image/jpeg"), Some("a.tiff")).is_ok());
    }

    #[test]
    fn test_relaxed_tolerates_placeholder_filename() {
        let v = validator(ValidationPolicy::Relaxed);
        assert!(v.validate(1024, None, Some("blob")).is_ok());
        assert!(v.validate(1024, None, Some("image")).is_ok());
        assert!(v.validate(1024, None, Some("blob:12345")).is_ok());
    }

    #[test]
    fn test_relaxed_still_rejects_unknown_extension_without_mime() {
        let v = validator(ValidationPolicy::Relaxed);
        assert!(matches!(
            v.validate(1024, None, Some("a.exe")),
            Err(ValidationError::ExtensionNotAllowed { .. })
        ));
    }

    #[test]
    fn test_valid_upload_passes() {
        let v = validator(ValidationPolicy::Strict);
        assert!(v.validate(2048, Some("image/png"), Some("photo.PNG")).is_ok());
    }

    #[test]
    fn test_missing_filename_skips_extension_check() {
        let v = validator(ValidationPolicy::Strict);
        assert!(v.validate(2048, Some("image/jpeg"), None).is_ok());
    }
}
