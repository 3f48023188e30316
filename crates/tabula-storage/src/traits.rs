//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Descriptive attributes stored alongside an uploaded object.
///
/// S3 writes them as user metadata (`category`, `description`); the local
/// backend writes a JSON sidecar next to the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UploadMetadata {
    /// Non-empty metadata entries as (key, value) pairs.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = Vec::with_capacity(2);
        if let Some(category) = self.category.as_deref().filter(|v| !v.is_empty()) {
            entries.push(("category", category));
        }
        if let Some(description) = self.description.as_deref().filter(|v| !v.is_empty()) {
            entries.push(("description", description));
        }
        entries
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// ingestion pipeline never depends on a concrete backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a new object under a freshly generated key and return (storage_key, storage_url)
    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        metadata: &UploadMetadata,
    ) -> StorageResult<(String, String)>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key. Returns `false` when nothing was stored under the key.
    async fn delete(&self, storage_key: &str) -> StorageResult<bool>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Provider name used when attributing failures to an external service.
    fn provider_name(&self) -> &'static str {
        self.backend_type().provider_name()
    }
}
