//! Ingestion pipeline: store → record → validate → persist rows → finalize.

use std::sync::Arc;

use tabula_core::constants::CSV_CONTENT_TYPE;
use tabula_core::models::{
    NewRowRecord, NewUpload, Severity, UploadRecord, UploadStatus, ValidationFinding,
    ValidationType,
};
use tabula_core::AppError;
use tabula_db::{RowRecordRepository, UploadRepository};
use tabula_storage::{Storage, UploadMetadata};

use super::types::{CsvSubmission, IngestError, IngestionOutcome};
use crate::table::{ParsedRow, RowReader};
use crate::validation::validate_csv;

pub struct IngestionPipeline {
    storage: Arc<dyn Storage>,
    uploads: Arc<dyn UploadRepository>,
    rows: Arc<dyn RowRecordRepository>,
}

impl IngestionPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        uploads: Arc<dyn UploadRepository>,
        rows: Arc<dyn RowRecordRepository>,
    ) -> Self {
        Self {
            storage,
            uploads,
            rows,
        }
    }

    /// Store, validate and persist one CSV file.
    ///
    /// A storage failure returns before anything is written to the database.
    /// Once the upload record exists, any later failure marks it `error` on a
    /// best-effort basis before the original failure is returned.
    #[tracing::instrument(
        skip(self, submission),
        fields(
            filename = %submission.filename,
            user_id = %submission.user_id,
            size_bytes = submission.content.len()
        )
    )]
    pub async fn ingest(&self, submission: CsvSubmission) -> Result<IngestionOutcome, IngestError> {
        let start = std::time::Instant::now();
        let metadata = UploadMetadata {
            category: submission.category.clone(),
            description: submission.description.clone(),
        };

        let (storage_key, storage_url) = self
            .storage
            .upload(
                submission.content.clone(),
                &submission.filename,
                CSV_CONTENT_TYPE,
                &metadata,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = self.storage.provider_name(),
                    "Storing CSV file failed"
                );
                IngestError::Storage {
                    provider: self.storage.provider_name().to_string(),
                    message: e.to_string(),
                }
            })?;

        let record = self
            .uploads
            .create(NewUpload {
                original_filename: submission.filename.clone(),
                storage_key: storage_key.clone(),
                storage_url,
                user_id: submission.user_id,
                category: submission.category.clone(),
                description: submission.description.clone(),
            })
            .await
            .map_err(classify_failure)?;

        let outcome = match self.process(&record, &submission).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                self.mark_failed(&record, &failure).await;
                return Err(classify_failure(failure));
            }
        };

        tracing::info!(
            upload_id = %outcome.upload_id,
            storage_key = %storage_key,
            row_count = outcome.records_count,
            status = outcome.status.as_str(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CSV ingestion finished"
        );

        Ok(outcome)
    }

    async fn process(
        &self,
        record: &UploadRecord,
        submission: &CsvSubmission,
    ) -> Result<IngestionOutcome, AppError> {
        let findings = validate_csv(
            &submission.content,
            submission.category.as_deref(),
            submission.description.as_deref(),
        );

        let records_count = self
            .persist_rows(record, &submission.content, &findings)
            .await?;

        let status = UploadStatus::from_findings(&findings);

        let updated = self
            .uploads
            .update_status(record.id, status, Some(&findings), Some(records_count))
            .await?
            .ok_or_else(|| {
                AppError::DatabaseMessage(format!(
                    "upload {} disappeared before its status could be updated",
                    record.id
                ))
            })?;

        Ok(IngestionOutcome {
            upload_id: updated.id,
            filename: submission.filename.clone(),
            storage_url: updated.storage_url,
            status,
            validations: findings,
            records_count,
            category: submission.category.clone(),
            description: submission.description.clone(),
            created_at: updated.created_at,
        })
    }

    /// Persist one record per data row, in file order. Returns the number written.
    async fn persist_rows(
        &self,
        record: &UploadRecord,
        content: &[u8],
        findings: &[ValidationFinding],
    ) -> Result<i32, AppError> {
        let reader = RowReader::new(content)
            .map_err(|e| AppError::Internal(format!("Failed to read CSV rows: {}", e)))?;

        let mut written = 0;
        for row in reader {
            let row =
                row.map_err(|e| AppError::Internal(format!("Failed to read CSV row: {}", e)))?;
            self.rows.create(row_record(record, row, findings)).await?;
            written += 1;
        }

        tracing::debug!(upload_id = %record.id, row_count = written, "Row records persisted");

        Ok(written)
    }

    async fn mark_failed(&self, record: &UploadRecord, failure: &AppError) {
        let finding = ValidationFinding::new(
            ValidationType::ProcessingError,
            failure.to_string(),
            Vec::new(),
            Severity::Error,
        );

        tracing::error!(
            upload_id = %record.id,
            error = %failure.detailed_message(),
            "CSV processing failed"
        );

        if let Err(e) = self
            .uploads
            .update_status(
                record.id,
                UploadStatus::Error,
                Some(std::slice::from_ref(&finding)),
                None,
            )
            .await
        {
            tracing::warn!(
                upload_id = %record.id,
                error = %e,
                "Failed to mark upload as errored"
            );
        }
    }
}

/// Build the record for one data row. A row is invalid when an error-severity
/// finding lists it; those findings' messages become its validation errors.
fn row_record(
    record: &UploadRecord,
    row: ParsedRow,
    findings: &[ValidationFinding],
) -> NewRowRecord {
    let errors: Vec<String> = findings
        .iter()
        .filter(|f| f.is_error() && f.affects_row(row.row_number))
        .map(|f| f.message.clone())
        .collect();

    NewRowRecord {
        upload_id: record.id,
        row_data: row.data,
        row_number: row.row_number,
        is_valid: errors.is_empty(),
        validation_errors: (!errors.is_empty()).then_some(errors),
    }
}

/// Sort a post-storage failure into the database or processing bucket.
fn classify_failure(failure: AppError) -> IngestError {
    let text = failure.to_string();
    let lowered = text.to_lowercase();
    let is_database = matches!(
        failure,
        AppError::Database(_) | AppError::DatabaseMessage(_)
    ) || lowered.contains("database")
        || lowered.contains("sql");

    if is_database {
        IngestError::Database(text)
    } else {
        IngestError::Processing(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockRowRecordRepository, MockStorage, MockUploadRepository};
    use uuid::Uuid;

    struct Harness {
        storage: Arc<MockStorage>,
        uploads: Arc<MockUploadRepository>,
        rows: Arc<MockRowRecordRepository>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with(
                MockStorage::new(),
                MockUploadRepository::new(),
                MockRowRecordRepository::new(),
            )
        }

        fn with(
            storage: MockStorage,
            uploads: MockUploadRepository,
            rows: MockRowRecordRepository,
        ) -> Self {
            Self {
                storage: Arc::new(storage),
                uploads: Arc::new(uploads),
                rows: Arc::new(rows),
            }
        }

        fn pipeline(&self) -> IngestionPipeline {
            IngestionPipeline::new(
                self.storage.clone(),
                self.uploads.clone(),
                self.rows.clone(),
            )
        }
    }

    fn submission(content: &str) -> CsvSubmission {
        CsvSubmission {
            content: content.as_bytes().to_vec(),
            filename: "people.csv".to_string(),
            user_id: Uuid::new_v4(),
            category: Some("hr".to_string()),
            description: Some("staff list".to_string()),
        }
    }

    #[tokio::test]
    async fn test_clean_file_completes() {
        let harness = Harness::new();
        let outcome = harness
            .pipeline()
            .ingest(submission("id,name\n1,Ann\n2,Bob\n"))
            .await
            .unwrap();

        assert_eq!(outcome.status, UploadStatus::Completed);
        assert_eq!(outcome.records_count, 2);
        assert_eq!(outcome.validations.len(), 1);
        assert_eq!(outcome.validations[0].validation_type, ValidationType::Success);
        assert_eq!(outcome.category.as_deref(), Some("hr"));

        let rows = harness.rows.rows_for(outcome.upload_id);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_valid && r.validation_errors.is_none()));
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_data.get("name"), Some("Bob"));

        let stored = harness.uploads.record(outcome.upload_id).unwrap();
        assert_eq!(stored.status, UploadStatus::Completed);
        assert_eq!(stored.records_count, 2);
        assert_eq!(stored.validations.as_deref(), Some(outcome.validations.as_slice()));

        let stored_file = harness.storage.get_file(&stored.storage_key).unwrap();
        assert_eq!(stored_file, b"id,name\n1,Ann\n2,Bob\n".to_vec());
        let metadata = harness.storage.get_metadata(&stored.storage_key).unwrap();
        assert_eq!(metadata.category.as_deref(), Some("hr"));
    }

    #[tokio::test]
    async fn test_warnings_do_not_invalidate_rows() {
        let harness = Harness::new();
        let outcome = harness
            .pipeline()
            .ingest(submission("id,name\n1,Ann\n2,\n1,Ann\n"))
            .await
            .unwrap();

        assert_eq!(outcome.status, UploadStatus::Completed);
        assert_eq!(outcome.records_count, 3);
        let types: Vec<_> = outcome.validations.iter().map(|f| f.validation_type).collect();
        assert_eq!(types, vec![ValidationType::EmptyValues, ValidationType::Duplicates]);

        let rows = harness.rows.rows_for(outcome.upload_id);
        assert!(rows.iter().all(|r| r.is_valid));
    }

    #[tokio::test]
    async fn test_type_error_marks_row_invalid() {
        let harness = Harness::new();
        let outcome = harness
            .pipeline()
            .ingest(submission("id,name\nabc,Ann\n"))
            .await
            .unwrap();

        assert_eq!(outcome.status, UploadStatus::CompletedWithErrors);
        assert_eq!(outcome.records_count, 1);

        let rows = harness.rows.rows_for(outcome.upload_id);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_valid);
        assert_eq!(
            rows[0].validation_errors,
            Some(vec!["Found 1 rows with incorrect data types".to_string()])
        );
    }

    #[tokio::test]
    async fn test_row_collects_every_error_message() {
        let harness = Harness::new();
        let outcome = harness
            .pipeline()
            .ingest(submission("id,name\nabc,Ann,extra\n2,Bob\n"))
            .await
            .unwrap();

        let rows = harness.rows.rows_for(outcome.upload_id);
        assert_eq!(
            rows[0].validation_errors,
            Some(vec![
                "Found 1 rows with incorrect data types".to_string(),
                "Found 1 rows with invalid format".to_string(),
            ])
        );
        assert!(rows[1].is_valid);
    }

    #[tokio::test]
    async fn test_header_only_completes_with_errors() {
        let harness = Harness::new();
        let outcome = harness
            .pipeline()
            .ingest(submission("id,name\n"))
            .await
            .unwrap();

        assert_eq!(outcome.status, UploadStatus::CompletedWithErrors);
        assert_eq!(outcome.records_count, 0);
        assert_eq!(outcome.validations[0].validation_type, ValidationType::EmptyFile);
        assert_eq!(harness.storage.file_count(), 1);
        assert!(harness.rows.rows_for(outcome.upload_id).is_empty());
    }

    #[tokio::test]
    async fn test_clean_file_without_trailing_newline() {
        let harness = Harness::new();
        let outcome = harness
            .pipeline()
            .ingest(submission(
                "id,nombre,email\n1,Juan,juan@test.com\n2,Maria,maria@test.com",
            ))
            .await
            .unwrap();

        assert_eq!(outcome.status, UploadStatus::Completed);
        assert_eq!(outcome.records_count, 2);
        let types: Vec<_> = outcome.validations.iter().map(|f| f.validation_type).collect();
        assert_eq!(types, vec![ValidationType::Success]);

        let rows = harness.rows.rows_for(outcome.upload_id);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].row_number, 3);
        assert_eq!(rows[1].row_data.get("email"), Some("maria@test.com"));
    }

    #[tokio::test]
    async fn test_empty_content_completes_with_errors() {
        let harness = Harness::new();
        let outcome = harness.pipeline().ingest(submission("")).await.unwrap();

        assert_eq!(outcome.status, UploadStatus::CompletedWithErrors);
        assert_eq!(outcome.records_count, 0);
        let types: Vec<_> = outcome.validations.iter().map(|f| f.validation_type).collect();
        assert_eq!(types, vec![ValidationType::EmptyFile]);

        let stored = harness.uploads.record(outcome.upload_id).unwrap();
        assert_eq!(stored.status, UploadStatus::CompletedWithErrors);
        assert_eq!(stored.records_count, 0);
        assert_eq!(harness.storage.file_count(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_file_marks_upload_errored() {
        let harness = Harness::new();
        let mut input = submission("");
        input.content = vec![0x69, 0x64, 0x0a, 0xff, 0x0a];

        let err = harness.pipeline().ingest(input).await.unwrap_err();

        assert!(matches!(err, IngestError::Processing(ref msg) if msg.contains("UTF-8")));

        let record = harness.uploads.only_record().unwrap();
        assert_eq!(record.status, UploadStatus::Error);
        assert_eq!(record.records_count, 0);
        let validations = record.validations.unwrap();
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].validation_type, ValidationType::ProcessingError);
        assert!(validations[0].message.contains("UTF-8"));
        assert_eq!(harness.rows.count(), 0);
        assert_eq!(harness.storage.file_count(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_persists_nothing() {
        let harness = Harness::with(
            MockStorage::failing("bucket unreachable"),
            MockUploadRepository::new(),
            MockRowRecordRepository::new(),
        );

        let err = harness
            .pipeline()
            .ingest(submission("id\n1\n"))
            .await
            .unwrap_err();

        match err {
            IngestError::Storage { provider, message } => {
                assert_eq!(provider, "AWS S3");
                assert!(message.contains("bucket unreachable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(harness.uploads.count(), 0);
        assert_eq!(harness.rows.count(), 0);
    }

    #[tokio::test]
    async fn test_row_persistence_failure_marks_upload_errored() {
        let harness = Harness::with(
            MockStorage::new(),
            MockUploadRepository::new(),
            MockRowRecordRepository::failing_at_row(3, "database connection lost"),
        );

        let err = harness
            .pipeline()
            .ingest(submission("id\n1\n2\n3\n"))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Database(ref msg) if msg.contains("database connection lost")));

        let record = harness.uploads.only_record().unwrap();
        assert_eq!(record.status, UploadStatus::Error);
        let validations = record.validations.unwrap();
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].validation_type, ValidationType::ProcessingError);
        assert_eq!(validations[0].severity, Severity::Error);
        assert!(validations[0].message.contains("database connection lost"));
        assert_eq!(harness.rows.count(), 1);
    }

    #[tokio::test]
    async fn test_non_database_failure_is_processing_error() {
        let harness = Harness::with(
            MockStorage::new(),
            MockUploadRepository::new(),
            MockRowRecordRepository::failing_at_row(2, "row quota exceeded"),
        );

        let err = harness
            .pipeline()
            .ingest(submission("id\n1\n"))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Processing(_)));
        assert_eq!(
            harness.uploads.only_record().unwrap().status,
            UploadStatus::Error
        );
    }

    #[tokio::test]
    async fn test_failed_error_update_keeps_original_failure() {
        let harness = Harness::with(
            MockStorage::new(),
            MockUploadRepository::new().failing_updates("status update rejected"),
            MockRowRecordRepository::new(),
        );

        let err = harness
            .pipeline()
            .ingest(submission("id\n1\n"))
            .await
            .unwrap_err();

        // The final status update fails; the follow-up error update fails too and is discarded.
        match err {
            IngestError::Processing(msg) => assert!(msg.contains("status update rejected")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            harness.uploads.only_record().unwrap().status,
            UploadStatus::Processing
        );
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure(AppError::Internal("SQL syntax".to_string())),
            IngestError::Database(_)
        ));
        assert!(matches!(
            classify_failure(AppError::DatabaseMessage("gone".to_string())),
            IngestError::Database(_)
        ));
        assert!(matches!(
            classify_failure(AppError::Internal("bad row".to_string())),
            IngestError::Processing(_)
        ));
    }
}
