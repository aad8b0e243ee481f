//! Uploaded images on the local filesystem, served under `/storage`.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use lekha_core::ports::{ImageStorage, StorageError};

/// Public URL prefix the server mounts the storage root at.
pub const PUBLIC_PREFIX: &str = "/storage";

pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(
        &self,
        folder: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let ext = extension_for(content_type)
            .ok_or_else(|| StorageError::UnsupportedType(content_type.to_string()))?;

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        tracing::info!(folder, file = %file_name, size = bytes.len(), "Image stored");
        Ok(format!("{PUBLIC_PREFIX}/{folder}/{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path());

        let url = storage
            .store("posts", "image/png", b"\x89PNG fake")
            .await
            .unwrap();

        assert!(url.starts_with("/storage/posts/"));
        assert!(url.ends_with(".png"));

        let file_name = url.rsplit('/').next().unwrap();
        let written = std::fs::read(dir.path().join("posts").join(file_name)).unwrap();
        assert_eq!(written, b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path());

        let err = storage
            .store("posts", "application/pdf", b"%PDF")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn test_each_upload_gets_its_own_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path());

        let a = storage.store("posts", "image/jpeg", b"a").await.unwrap();
        let b = storage.store("posts", "image/jpeg", b"a").await.unwrap();

        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
    }
}
