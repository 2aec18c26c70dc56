//! Asset storage abstraction for uploaded images and attachments.

use anyhow::Result;
use async_trait::async_trait;

/// Stores opaque binary assets and hands back stable references.
///
/// The engine calls this before creating an auction record and then
/// treats the returned reference as an opaque string; it never reads
/// the asset back.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist `bytes` and return a stable reference to it.
    ///
    /// `original_name` is advisory; implementations may keep its
    /// extension but must not trust the rest of the name.
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String>;
}
