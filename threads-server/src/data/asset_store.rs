use async_trait::async_trait;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadedAsset {
    /// Public URL stored on the record and served to clients.
    pub(crate) url: String,
    /// Identifier used to delete the asset later.
    pub(crate) asset_id: String,
}

/// External image hosting.
#[async_trait]
pub(crate) trait AssetStore: Send + Sync {
    /// `payload` is a data URI or a remote URL the store fetches itself.
    async fn upload(&self, payload: &str) -> Result<UploadedAsset, DomainError>;
    async fn delete(&self, asset_id: &str) -> Result<(), DomainError>;
}
