//! File-storage area for uploaded photos
//!
//! Photos live under a configurable root with one subdirectory per kind
//! (`avatars/`, `tobaccos/`, `coals/`). Files are stored under a fresh
//! uuid name; the relative path (e.g. `uploads/tobaccos/<uuid>.png`) is
//! what gets persisted in the database. Removing a replaced file is
//! best-effort: failures are logged, never fatal.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Subdirectory for account avatars
pub const AVATARS_DIR: &str = "avatars";
/// Subdirectory for tobacco photos
pub const TOBACCOS_DIR: &str = "tobaccos";
/// Subdirectory for coal photos
pub const COALS_DIR: &str = "coals";

const SUBDIRS: [&str; 3] = [AVATARS_DIR, TOBACCOS_DIR, COALS_DIR];
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Upload storage rooted at the configured directory
#[derive(Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage subdirectories if they do not exist yet
    pub async fn ensure_dirs(&self) -> Result<()> {
        for subdir in SUBDIRS {
            let dir = self.root.join(subdir);
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create upload dir {}", dir.display()))?;
        }
        Ok(())
    }

    /// Accepted image extension for an uploaded file name, if any
    pub fn image_extension(file_name: &str) -> Option<&'static str> {
        let ext = Path::new(file_name).extension()?.to_str()?.to_lowercase();
        ALLOWED_EXTENSIONS.iter().find(|e| **e == ext).copied()
    }

    /// Store uploaded bytes under a fresh uuid name
    ///
    /// Returns the relative path to persist in the database.
    pub async fn save(&self, subdir: &str, extension: &str, bytes: &[u8]) -> Result<String> {
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(subdir).join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write upload {}", path.display()))?;
        Ok(format!("uploads/{}/{}", subdir, file_name))
    }

    /// Remove a previously stored file, given its persisted relative path
    ///
    /// Unlink failures (already gone, permissions) are logged and
    /// swallowed; a stale file must never fail the request that
    /// replaced it.
    pub async fn remove(&self, stored_path: &str) {
        let relative = stored_path.strip_prefix("uploads/").unwrap_or(stored_path);
        let path = self.root.join(relative);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Failed to remove upload {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_whitelist() {
        assert_eq!(Storage::image_extension("photo.png"), Some("png"));
        assert_eq!(Storage::image_extension("photo.JPG"), Some("jpg"));
        assert_eq!(Storage::image_extension("photo.jpeg"), Some("jpeg"));
        assert_eq!(Storage::image_extension("photo.webp"), Some("webp"));
        assert_eq!(Storage::image_extension("photo.gif"), None);
        assert_eq!(Storage::image_extension("photo"), None);
        assert_eq!(Storage::image_extension(""), None);
    }

    #[tokio::test]
    async fn test_save_and_remove_round_trip() {
        let dir = std::env::temp_dir().join(format!("hookah-storage-{}", Uuid::new_v4()));
        let storage = Storage::new(&dir);
        storage.ensure_dirs().await.unwrap();

        let stored = storage.save(TOBACCOS_DIR, "png", b"fake-png").await.unwrap();
        assert!(stored.starts_with("uploads/tobaccos/"));
        assert!(stored.ends_with(".png"));

        let on_disk = dir.join(stored.strip_prefix("uploads/").unwrap());
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"fake-png");

        storage.remove(&stored).await;
        assert!(tokio::fs::metadata(&on_disk).await.is_err());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_silent() {
        let storage = Storage::new(std::env::temp_dir());
        // Must not panic or error outward
        storage.remove("uploads/tobaccos/does-not-exist.png").await;
    }
}
