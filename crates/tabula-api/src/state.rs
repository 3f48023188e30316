//! Application state shared by all handlers.

use std::sync::Arc;
use tabula_core::Config;
use tabula_db::{RowRecordRepository, UploadRepository};
use tabula_processing::IngestionPipeline;
use tabula_storage::Storage;

/// Upload and row repositories plus the pipeline that writes through them.
#[derive(Clone)]
pub struct FilesState {
    pub uploads: Arc<dyn UploadRepository>,
    pub records: Arc<dyn RowRecordRepository>,
    pub pipeline: Arc<IngestionPipeline>,
}

impl FilesState {
    pub fn new(
        uploads: Arc<dyn UploadRepository>,
        records: Arc<dyn RowRecordRepository>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let pipeline = Arc::new(IngestionPipeline::new(
            storage,
            uploads.clone(),
            records.clone(),
        ));
        Self {
            uploads,
            records,
            pipeline,
        }
    }
}

/// Upload policy derived from configuration.
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    pub allowed_roles: Vec<String>,
    pub max_file_size: usize,
}

impl UploadPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_roles: config.allowed_upload_roles().to_vec(),
            max_file_size: config.max_upload_size_bytes(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub files: FilesState,
    pub upload_policy: UploadPolicy,
}
