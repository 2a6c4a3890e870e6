//! Media storage
//!
//! Persists uploaded product images under the media directory. Files
//! are written before the database transaction and deleted again if it
//! fails, so stored paths always refer to existing files.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::utils::AppError;

/// Image subdirectory, relative to the media root.
const IMAGE_DIR: &str = "products/images";

/// Accepted upload extensions.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: PathBuf) -> Result<Self, AppError> {
        std::fs::create_dir_all(root.join(IMAGE_DIR))
            .map_err(|e| AppError::internal(format!("Failed to create media dir: {e}")))?;
        Ok(Self { root })
    }

    /// Store an uploaded image, keyed by a fresh UUID. Returns the
    /// path relative to the media root, which is what the image table
    /// persists.
    pub fn save_image(&self, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| AppError::validation("Image file has no extension"))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported image type .{extension}, expected one of {ALLOWED_EXTENSIONS:?}"
            )));
        }

        // Reject files whose content type does not look like an image
        let mime = mime_guess::from_ext(&extension).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(AppError::validation(format!(
                "Unsupported content type {mime}"
            )));
        }

        let relative = format!("{IMAGE_DIR}/{}.{extension}", Uuid::new_v4());
        let full_path = self.root.join(&relative);
        std::fs::write(&full_path, bytes)
            .map_err(|e| AppError::internal(format!("Failed to write image: {e}")))?;
        Ok(relative)
    }

    /// Remove a stored file. Missing files are ignored so rollback
    /// cleanup can run unconditionally.
    pub fn delete(&self, relative: &str) {
        let full_path = self.root.join(relative);
        if let Err(e) = std::fs::remove_file(&full_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %full_path.display(), error = %e, "Failed to delete media file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_delete_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf()).unwrap();

        let relative = store.save_image("photo.JPG", b"fake-jpeg-bytes").unwrap();
        assert!(relative.starts_with("products/images/"));
        assert!(relative.ends_with(".jpg"));
        assert!(dir.path().join(&relative).exists());

        store.delete(&relative);
        assert!(!dir.path().join(&relative).exists());
        // Idempotent
        store.delete(&relative);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf()).unwrap();

        assert!(store.save_image("script.sh", b"#!/bin/sh").is_err());
        assert!(store.save_image("noext", b"data").is_err());
    }
}
