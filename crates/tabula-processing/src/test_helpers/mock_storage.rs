//! Mock Storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tabula_storage::keys::generate_storage_key;
use tabula_storage::{Storage, StorageBackend, StorageError, StorageResult, UploadMetadata};

/// Mock storage implementation that stores files in memory
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, (Vec<u8>, UploadMetadata)>>>,
    backend_type: StorageBackend,
    upload_failure: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::with_backend(StorageBackend::S3)
    }

    pub fn with_backend(backend_type: StorageBackend) -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            backend_type,
            upload_failure: None,
        }
    }

    /// Storage whose uploads always fail with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            upload_failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Get file data (for test assertions)
    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(key)
            .map(|(data, _)| data.clone())
    }

    pub fn get_metadata(&self, key: &str) -> Option<UploadMetadata> {
        self.files
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, metadata)| metadata.clone())
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        _content_type: &str,
        metadata: &UploadMetadata,
    ) -> StorageResult<(String, String)> {
        if let Some(ref message) = self.upload_failure {
            return Err(StorageError::UploadFailed(message.clone()));
        }
        let storage_key = generate_storage_key(filename, chrono::Utc::now());
        self.files
            .lock()
            .unwrap()
            .insert(storage_key.clone(), (data, metadata.clone()));
        let storage_url = format!("https://example.com/{}", storage_key);
        Ok((storage_key, storage_url))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.get_file(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().remove(storage_key).is_some())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend_type
    }
}
