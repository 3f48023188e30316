use crate::keys::{generate_storage_key, validate_key};
use crate::traits::{Storage, StorageError, StorageResult, UploadMetadata};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const METADATA_SUFFIX: &str = ".metadata.json";

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tabula/uploads")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:4000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, rejecting traversal sequences
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if !validate_key(storage_key) {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(storage_key))
    }

    fn metadata_path(path: &Path) -> PathBuf {
        let mut raw = path.as_os_str().to_owned();
        raw.push(METADATA_SUFFIX);
        PathBuf::from(raw)
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Read back the metadata written alongside an object, if any.
    pub async fn read_metadata(&self, storage_key: &str) -> StorageResult<Option<UploadMetadata>> {
        let path = Self::metadata_path(&self.key_to_path(storage_key)?);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }
        let raw = fs::read(&path).await?;
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| StorageError::BackendError(format!("Corrupt metadata file: {}", e)))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        _content_type: &str,
        metadata: &UploadMetadata,
    ) -> StorageResult<(String, String)> {
        let key = generate_storage_key(filename, chrono::Utc::now());
        let path = self.key_to_path(&key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();
        Self::write_file(&path, &data).await?;

        if !metadata.entries().is_empty() {
            let encoded = serde_json::to_vec(metadata).map_err(|e| {
                StorageError::UploadFailed(format!("Failed to encode metadata: {}", e))
            })?;
            Self::write_file(&Self::metadata_path(&path), &encoded).await?;
        }

        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok((key, url))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            key = %storage_key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(data)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(false);
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        let metadata_path = Self::metadata_path(&path);
        if fs::try_exists(&metadata_path).await.unwrap_or(false) {
            if let Err(e) = fs::remove_file(&metadata_path).await {
                tracing::warn!(error = %e, key = %storage_key, "Failed to delete metadata sidecar");
            }
        }

        tracing::info!(key = %storage_key, "Local storage delete successful");

        Ok(true)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
