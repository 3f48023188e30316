//! Repository and pipeline wiring

use crate::state::{AppState, FilesState, UploadPolicy};
use sqlx::PgPool;
use std::sync::Arc;
use tabula_core::Config;
use tabula_db::{PgRowRecordRepository, PgUploadRepository};
use tabula_storage::Storage;

/// Build the shared application state on top of a database pool and storage backend
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let uploads = Arc::new(PgUploadRepository::new(pool.clone()));
    let records = Arc::new(PgRowRecordRepository::new(pool));

    let upload_policy = UploadPolicy::from_config(config);
    tracing::info!(
        allowed_roles = %upload_policy.allowed_roles.join(","),
        max_upload_mb = upload_policy.max_file_size / 1024 / 1024,
        "Upload policy configured"
    );

    Arc::new(AppState {
        files: FilesState::new(uploads, records, storage),
        upload_policy,
    })
}
