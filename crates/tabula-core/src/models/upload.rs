use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validation::ValidationFinding;

/// Upload processing status (matches database enum `upload_status`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "upload_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Processing,
    Completed,
    CompletedWithErrors,
    Error,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Processing => "processing",
            UploadStatus::Completed => "completed",
            UploadStatus::CompletedWithErrors => "completed_with_errors",
            UploadStatus::Error => "error",
        }
    }

    /// Final status for a finished validation run.
    pub fn from_findings(findings: &[ValidationFinding]) -> Self {
        if super::validation::has_errors(findings) {
            UploadStatus::CompletedWithErrors
        } else {
            UploadStatus::Completed
        }
    }
}

/// One submitted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: Uuid,
    pub original_filename: String,
    pub storage_key: String,
    pub storage_url: String,
    pub user_id: Uuid,
    pub status: UploadStatus,
    pub validations: Option<Vec<ValidationFinding>>,
    pub records_count: i32,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values supplied when an upload record is first created.
///
/// New records always start in `processing` with no findings and zero rows.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub original_filename: String,
    pub storage_key: String,
    pub storage_url: String,
    pub user_id: Uuid,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Response body of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileUploadResponse {
    pub file_id: Uuid,
    pub filename: String,
    pub storage_url: String,
    pub status: UploadStatus,
    pub validations: Vec<ValidationFinding>,
    pub records_count: i32,
    pub category: Option<String>,
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Upload as returned by the read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub storage_url: String,
    pub status: UploadStatus,
    pub validations: Option<Vec<ValidationFinding>>,
    pub records_count: i32,
    pub category: Option<String>,
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<UploadRecord> for UploadResponse {
    fn from(record: UploadRecord) -> Self {
        UploadResponse {
            id: record.id,
            filename: record.original_filename,
            storage_url: record.storage_url,
            status: record.status,
            validations: record.validations,
            records_count: record.records_count,
            category: record.category,
            description: record.description,
            uploaded_at: record.created_at,
        }
    }
}
