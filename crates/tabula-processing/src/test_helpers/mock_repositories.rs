//! Mock repository implementations for testing

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use tabula_core::models::{
    NewRowRecord, NewUpload, RowRecord, UploadRecord, UploadStatus, ValidationFinding,
};
use tabula_core::AppError;
use tabula_db::{RowRecordRepository, UploadRepository};
use uuid::Uuid;

/// Upload store kept in insertion order
#[derive(Default)]
pub struct MockUploadRepository {
    records: Mutex<Vec<UploadRecord>>,
    update_failure: Option<String>,
}

impl MockUploadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `update_status` call fails with `message`
    pub fn failing_updates(mut self, message: &str) -> Self {
        self.update_failure = Some(message.to_string());
        self
    }

    /// Seed an existing record
    pub fn insert(&self, record: UploadRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn record(&self, id: Uuid) -> Option<UploadRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// The single stored record, if exactly one exists
    pub fn only_record(&self) -> Option<UploadRecord> {
        let records = self.records.lock().unwrap();
        match records.as_slice() {
            [record] => Some(record.clone()),
            _ => None,
        }
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl UploadRepository for MockUploadRepository {
    async fn create(&self, upload: NewUpload) -> Result<UploadRecord, AppError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.storage_key == upload.storage_key) {
            return Err(AppError::DatabaseMessage(format!(
                "duplicate storage key {}",
                upload.storage_key
            )));
        }
        let record = UploadRecord {
            id: Uuid::new_v4(),
            original_filename: upload.original_filename,
            storage_key: upload.storage_key,
            storage_url: upload.storage_url,
            user_id: upload.user_id,
            status: UploadStatus::Processing,
            validations: None,
            records_count: 0,
            category: upload.category,
            description: upload.description,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        Ok(self.record(id))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: UploadStatus,
        validations: Option<&[ValidationFinding]>,
        records_count: Option<i32>,
    ) -> Result<Option<UploadRecord>, AppError> {
        if let Some(ref message) = self.update_failure {
            return Err(AppError::Internal(message.clone()));
        }
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.status = status;
        if let Some(validations) = validations {
            record.validations = Some(validations.to_vec());
        }
        if let Some(count) = records_count {
            record.records_count = count;
        }
        Ok(Some(record.clone()))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UploadRecord>, AppError> {
        let mut owned: Vec<UploadRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}

/// Row store that can be told to fail on a given row number
#[derive(Default)]
pub struct MockRowRecordRepository {
    rows: Mutex<Vec<RowRecord>>,
    failure: Option<(i32, String)>,
}

impl MockRowRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creating the record for `row_number` fails with `message`
    pub fn failing_at_row(row_number: i32, message: &str) -> Self {
        Self {
            failure: Some((row_number, message.to_string())),
            ..Self::default()
        }
    }

    pub fn rows_for(&self, upload_id: Uuid) -> Vec<RowRecord> {
        let mut rows: Vec<RowRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.upload_id == upload_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.row_number);
        rows
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl RowRecordRepository for MockRowRecordRepository {
    async fn create(&self, record: NewRowRecord) -> Result<RowRecord, AppError> {
        if let Some((row_number, ref message)) = self.failure {
            if row_number == record.row_number {
                return Err(AppError::Internal(message.clone()));
            }
        }
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.upload_id == record.upload_id && r.row_number == record.row_number)
        {
            return Err(AppError::DatabaseMessage(format!(
                "duplicate row {} for upload {}",
                record.row_number, record.upload_id
            )));
        }
        let row = RowRecord {
            id: Uuid::new_v4(),
            upload_id: record.upload_id,
            row_data: record.row_data,
            row_number: record.row_number,
            is_valid: record.is_valid,
            validation_errors: record.validation_errors,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_by_upload(&self, upload_id: Uuid) -> Result<Vec<RowRecord>, AppError> {
        Ok(self.rows_for(upload_id))
    }
}
