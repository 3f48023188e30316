//! Types for the ingestion pipeline.

use chrono::{DateTime, Utc};
use tabula_core::models::{FileUploadResponse, UploadStatus, ValidationFinding};
use tabula_core::AppError;
use uuid::Uuid;

/// Raw file plus the caller-supplied context.
#[derive(Clone, Debug)]
pub struct CsvSubmission {
    pub content: Vec<u8>,
    pub filename: String,
    pub user_id: Uuid,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Result of a completed ingestion.
#[derive(Clone, Debug)]
pub struct IngestionOutcome {
    pub upload_id: Uuid,
    pub filename: String,
    pub storage_url: String,
    pub status: UploadStatus,
    pub validations: Vec<ValidationFinding>,
    pub records_count: i32,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<IngestionOutcome> for FileUploadResponse {
    fn from(outcome: IngestionOutcome) -> Self {
        FileUploadResponse {
            file_id: outcome.upload_id,
            filename: outcome.filename,
            storage_url: outcome.storage_url,
            status: outcome.status,
            validations: outcome.validations,
            records_count: outcome.records_count,
            category: outcome.category,
            description: outcome.description,
            uploaded_at: outcome.created_at,
        }
    }
}

/// Pipeline failures
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file never reached storage. Nothing was persisted.
    #[error("Error uploading file to {provider}: {message}")]
    Storage { provider: String, message: String },

    #[error("Failed to process file: {0}")]
    Database(String),

    #[error("Failed to process file: {0}")]
    Processing(String),
}

/// Service name reported for non-storage processing failures.
pub const PROCESSING_SERVICE: &str = "processing";

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Storage { provider, message } => AppError::ExternalService {
                service: provider,
                message,
            },
            IngestError::Database(_) => AppError::DatabaseMessage(err.to_string()),
            IngestError::Processing(_) => AppError::ExternalService {
                service: PROCESSING_SERVICE.to_string(),
                message: err.to_string(),
            },
        }
    }
}
