//! Image storage port.

use async_trait::async_trait;

/// Stores uploaded images and hands back their public URL.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `bytes` under `folder` and return the URL it is served from.
    async fn store(
        &self,
        folder: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
