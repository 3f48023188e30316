//! Repository trait abstractions
//!
//! The ingestion pipeline and HTTP handlers depend on these traits rather than
//! on the Postgres repositories, so they can be exercised against in-memory mocks.

use async_trait::async_trait;
use tabula_core::models::{
    NewRowRecord, NewUpload, RowRecord, UploadRecord, UploadStatus, ValidationFinding,
};
use tabula_core::AppError;
use uuid::Uuid;

/// Upload record store
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Insert a new upload in `processing` state with zero rows and no findings
    async fn create(&self, upload: NewUpload) -> Result<UploadRecord, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError>;

    /// Set the status and, when given, the findings and row count.
    /// `None` leaves the stored value untouched. Returns `None` for an unknown id.
    async fn update_status(
        &self,
        id: Uuid,
        status: UploadStatus,
        validations: Option<&[ValidationFinding]>,
        records_count: Option<i32>,
    ) -> Result<Option<UploadRecord>, AppError>;

    /// A user's uploads, newest first
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UploadRecord>, AppError>;
}

/// Per-row record store
#[async_trait]
pub trait RowRecordRepository: Send + Sync {
    async fn create(&self, record: NewRowRecord) -> Result<RowRecord, AppError>;

    /// All rows of an upload ordered by row number
    async fn list_by_upload(&self, upload_id: Uuid) -> Result<Vec<RowRecord>, AppError>;
}
