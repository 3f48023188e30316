use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use tabula_core::models::{NewUpload, UploadRecord, UploadStatus, ValidationFinding};
use tabula_core::AppError;
use uuid::Uuid;

use crate::traits::UploadRepository;

const UPLOAD_COLUMNS: &str = "id, original_filename, storage_key, storage_url, user_id, status, \
     validations, records_count, category, description, created_at";

#[derive(Debug, FromRow)]
struct UploadRow {
    id: Uuid,
    original_filename: String,
    storage_key: String,
    storage_url: String,
    user_id: Uuid,
    status: UploadStatus,
    validations: Option<Json<Vec<ValidationFinding>>>,
    records_count: i32,
    category: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UploadRow> for UploadRecord {
    fn from(row: UploadRow) -> Self {
        UploadRecord {
            id: row.id,
            original_filename: row.original_filename,
            storage_key: row.storage_key,
            storage_url: row.storage_url,
            user_id: row.user_id,
            status: row.status,
            validations: row.validations.map(|Json(v)| v),
            records_count: row.records_count,
            category: row.category,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Repository for the `file_uploads` table
#[derive(Clone)]
pub struct PgUploadRepository {
    pool: PgPool,
}

impl PgUploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadRepository for PgUploadRepository {
    #[tracing::instrument(
        skip(self, upload),
        fields(db.table = "file_uploads", db.operation = "insert", storage_key = %upload.storage_key)
    )]
    async fn create(&self, upload: NewUpload) -> Result<UploadRecord, AppError> {
        let row = sqlx::query_as::<Postgres, UploadRow>(&format!(
            r#"
            INSERT INTO file_uploads
                (original_filename, storage_key, storage_url, user_id, status, records_count, category, description)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7)
            RETURNING {UPLOAD_COLUMNS}
            "#
        ))
        .bind(&upload.original_filename)
        .bind(&upload.storage_key)
        .bind(&upload.storage_url)
        .bind(upload.user_id)
        .bind(UploadStatus::Processing)
        .bind(&upload.category)
        .bind(&upload.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(upload_id = %row.id, "Upload record created");

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_uploads", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, UploadRow>(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM file_uploads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(
        skip(self, validations),
        fields(db.table = "file_uploads", db.operation = "update", db.record_id = %id)
    )]
    async fn update_status(
        &self,
        id: Uuid,
        status: UploadStatus,
        validations: Option<&[ValidationFinding]>,
        records_count: Option<i32>,
    ) -> Result<Option<UploadRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, UploadRow>(&format!(
            r#"
            UPDATE file_uploads
            SET status = $2,
                validations = COALESCE($3::jsonb, validations),
                records_count = COALESCE($4, records_count)
            WHERE id = $1
            RETURNING {UPLOAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(validations.map(Json))
        .bind(records_count)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_uploads", db.operation = "select"))]
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UploadRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, UploadRow>(&format!(
            r#"
            SELECT {UPLOAD_COLUMNS} FROM file_uploads
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
