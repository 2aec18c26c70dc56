//! Filesystem-backed asset storage.
//!
//! Uploaded images and attachments land under a configured directory
//! with random stable names; the returned file name is the opaque
//! reference recorded on the auction record.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::traits::AssetStore;

/// Asset store writing to a local directory.
#[derive(Debug, Clone)]
pub struct LocalAssets {
    upload_dir: PathBuf,
}

impl LocalAssets {
    /// Create a store rooted at `upload_dir`, creating it if needed.
    pub async fn new(upload_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        tokio::fs::create_dir_all(&upload_dir)
            .await
            .with_context(|| format!("creating upload directory {}", upload_dir.display()))?;
        Ok(Self { upload_dir })
    }

    /// Absolute path for a stored reference.
    pub fn path_for(&self, reference: &str) -> PathBuf {
        self.upload_dir.join(reference)
    }
}

#[async_trait]
impl AssetStore for LocalAssets {
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String> {
        // Keep only the extension of the client-supplied name.
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let reference = format!("{}{extension}", Uuid::new_v4());

        let path = self.upload_dir.join(&reference);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing asset to {}", path.display()))?;

        debug!(reference, size = bytes.len(), "Stored asset");
        Ok(reference)
    }
}
