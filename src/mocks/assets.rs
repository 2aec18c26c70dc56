//! In-memory asset store for testing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::traits::AssetStore;

/// Asset store that keeps payloads in memory.
#[derive(Debug, Clone)]
pub struct MemoryAssets {
    inner: Arc<MemoryAssetsInner>,
}

#[derive(Debug)]
struct MemoryAssetsInner {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    next_id: AtomicU64,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryAssetsInner {
                blobs: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Number of assets stored so far.
    pub async fn stored_count(&self) -> usize {
        self.inner.blobs.read().await.len()
    }

    /// Fetch a stored payload back, for assertions.
    pub async fn get(&self, reference: &str) -> Option<Vec<u8>> {
        self.inner.blobs.read().await.get(reference).cloned()
    }
}

impl Default for MemoryAssets {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetStore for MemoryAssets {
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String> {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let reference = format!("asset-{id}{extension}");
        self.inner
            .blobs
            .write()
            .await
            .insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }
}
