use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create upload directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A file persisted by the store.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Unique identifier for this upload; never reused.
    pub file_id: Uuid,
    pub path: PathBuf,
    pub extension: String,
}

/// Local filesystem upload store.
///
/// Files are written to `{upload_dir}/{file_id}.{extension}`. The store is
/// the only component that touches these paths; callers go through
/// `delete` and `purge_older_than` for removal.
#[derive(Clone)]
pub struct UploadStore {
    upload_dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    /// Create a new store, creating the upload directory if absent.
    pub async fn new(
        upload_dir: impl Into<PathBuf>,
        allowed_extensions: Vec<String>,
    ) -> StorageResult<Self> {
        let upload_dir = upload_dir.into();

        fs::create_dir_all(&upload_dir)
            .await
            .map_err(|e| StorageError::CreateDir {
                path: upload_dir.display().to_string(),
                source: e,
            })?;

        Ok(UploadStore {
            upload_dir,
            allowed_extensions,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Persist upload bytes under a freshly generated unique name.
    ///
    /// On write failure the partial file is removed before the error is
    /// surfaced; the store never leaves a corrupt file behind.
    pub async fn store(
        &self,
        data: &[u8],
        declared_filename: Option<&str>,
        declared_mime_type: Option<&str>,
    ) -> StorageResult<StoredFile> {
        let file_id = Uuid::new_v4();
        let extension = self.resolve_extension(declared_filename, declared_mime_type);
        let path = self.upload_dir.join(format!("{}.{}", file_id, extension));

        let start = std::time::Instant::now();

        let write_result = async {
            let mut file = fs::File::create(&path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            Ok::<(), std::io::Error>(())
        }
        .await;

        if let Err(e) = write_result {
            let _ = fs::remove_file(&path).await;
            return Err(StorageError::WriteFailed {
                path: path.display().to_string(),
                source: e,
            });
        }

        tracing::info!(
            path = %path.display(),
            file_id = %file_id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(StoredFile {
            file_id,
            path,
            extension,
        })
    }

    /// Delete a stored file. Idempotent: returns `true` when a file was
    /// removed, `false` when the path did not exist.
    pub async fn delete(&self, path: &Path) -> bool {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return false;
        }

        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Stored file deleted");
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete stored file");
                false
            }
        }
    }

    /// Delete every regular file in the upload directory whose mtime is
    /// older than `max_age`. Per-file errors are logged and skipped;
    /// returns the number of files deleted.
    pub async fn purge_older_than(&self, max_age: Duration) -> usize {
        let now = SystemTime::now();
        let mut purged = 0usize;

        let mut entries = match fs::read_dir(&self.upload_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(
                    dir = %self.upload_dir.display(),
                    error = %e,
                    "Failed to read upload directory for purge"
                );
                return 0;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let expired = metadata
                .modified()
                .ok()
                .and_then(|mtime| now.duration_since(mtime).ok())
                .is_some_and(|age| age > max_age);

            if expired {
                match fs::remove_file(&path).await {
                    Ok(()) => purged += 1,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to purge file");
                    }
                }
            }
        }

        tracing::info!(dir = %self.upload_dir.display(), purged, "Purge completed");
        purged
    }

    /// Determine the stored extension: the declared filename's extension
    /// when it is allowed, else one inferred from the MIME type, else jpg.
    fn resolve_extension(
        &self,
        declared_filename: Option<&str>,
        declared_mime_type: Option<&str>,
    ) -> String {
        if let Some(name) = declared_filename {
            if let Some(ext) = Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
            {
                if self.allowed_extensions.contains(&ext) {
                    return ext;
                }
            }
        }

        declared_mime_type
            .and_then(extension_for_mime)
            .unwrap_or("jpg")
            .to_string()
    }
}

fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/bmp" => Some("bmp"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn allowed() -> Vec<String> {
        ["jpg", "jpeg", "png", "gif", "bmp", "webp"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_store_writes_unique_file() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path(), allowed()).await.unwrap();

        let stored = store
            .store(b"jpeg bytes", Some("photo.jpg"), Some("image/jpeg"))
            .await
            .unwrap();

        assert_eq!(stored.extension, "jpg");
        assert!(stored.path.exists());
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"jpeg bytes");

        let again = store
            .store(b"jpeg bytes", Some("photo.jpg"), Some("image/jpeg"))
            .await
            .unwrap();
        assert_ne!(stored.path, again.path);
        assert_ne!(stored.file_id, again.file_id);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path(), allowed()).await.unwrap();

        let stored = store
            .store(b"data", Some("a.png"), Some("image/png"))
            .await
            .unwrap();

        assert!(store.delete(&stored.path).await);
        assert!(!stored.path.exists());
        assert!(!store.delete(&stored.path).await);
    }

    #[tokio::test]
    async fn test_extension_precedence() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path(), allowed()).await.unwrap();

        // Allowed filename extension wins.
        let s = store
            .store(b"x", Some("pic.webp"), Some("image/png"))
            .await
            .unwrap();
        assert_eq!(s.extension, "webp");

        // Disallowed extension falls back to the MIME mapping.
        let s = store
            .store(b"x", Some("pic.tiff"), Some("image/png"))
            .await
            .unwrap();
        assert_eq!(s.extension, "png");

        // Placeholder name with unknown MIME falls back to jpg.
        let s = store
            .store(b"x", Some("blob"), Some("application/octet-stream"))
            .await
            .unwrap();
        assert_eq!(s.extension, "jpg");

        // Nothing declared at all.
        let s = store.store(b"x", None, None).await.unwrap();
        assert_eq!(s.extension, "jpg");
    }

    #[tokio::test]
    async fn test_purge_older_than() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path(), allowed()).await.unwrap();

        let old = store.store(b"old", Some("a.jpg"), None).await.unwrap();
        let fresh = store.store(b"new", Some("b.jpg"), None).await.unwrap();

        // Backdate one file's mtime beyond the threshold.
        let backdated = SystemTime::now() - Duration::from_secs(48 * 3600);
        let file = std::fs::File::options()
            .write(true)
            .open(&old.path)
            .unwrap();
        file.set_modified(backdated).unwrap();

        let purged = store.purge_older_than(Duration::from_secs(24 * 3600)).await;

        assert_eq!(purged, 1);
        assert!(!old.path.exists());
        assert!(fresh.path.exists());
    }
}
