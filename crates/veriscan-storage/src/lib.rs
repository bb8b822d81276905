//! Filesystem upload store.
//!
//! Owns the upload directory: every stored file is written under a freshly
//! generated UUID filename, so concurrent requests never collide. Deletion
//! is idempotent and age-based purging is best-effort.

mod local;

pub use local::{StorageError, StoredFile, UploadStore};

use veriscan_core::AppError;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}
