use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use tabula_core::models::{NewRowRecord, RowData, RowRecord};
use tabula_core::AppError;
use uuid::Uuid;

use crate::traits::RowRecordRepository;

#[derive(Debug, FromRow)]
struct RowRecordRow {
    id: Uuid,
    upload_id: Uuid,
    row_data: Json<RowData>,
    row_number: i32,
    is_valid: bool,
    validation_errors: Option<Json<Vec<String>>>,
    created_at: DateTime<Utc>,
}

impl From<RowRecordRow> for RowRecord {
    fn from(row: RowRecordRow) -> Self {
        RowRecord {
            id: row.id,
            upload_id: row.upload_id,
            row_data: row.row_data.0,
            row_number: row.row_number,
            is_valid: row.is_valid,
            validation_errors: row.validation_errors.map(|Json(v)| v),
            created_at: row.created_at,
        }
    }
}

/// Repository for the `csv_records` table
#[derive(Clone)]
pub struct PgRowRecordRepository {
    pool: PgPool,
}

impl PgRowRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RowRecordRepository for PgRowRecordRepository {
    #[tracing::instrument(
        skip(self, record),
        fields(db.table = "csv_records", db.operation = "insert", upload_id = %record.upload_id, row_number = record.row_number)
    )]
    async fn create(&self, record: NewRowRecord) -> Result<RowRecord, AppError> {
        let row = sqlx::query_as::<Postgres, RowRecordRow>(
            r#"
            INSERT INTO csv_records (upload_id, row_data, row_number, is_valid, validation_errors)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, upload_id, row_data, row_number, is_valid, validation_errors, created_at
            "#,
        )
        .bind(record.upload_id)
        .bind(Json(&record.row_data))
        .bind(record.row_number)
        .bind(record.is_valid)
        .bind(record.validation_errors.as_ref().map(Json))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "csv_records", db.operation = "select", upload_id = %upload_id))]
    async fn list_by_upload(&self, upload_id: Uuid) -> Result<Vec<RowRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, RowRecordRow>(
            r#"
            SELECT id, upload_id, row_data, row_number, is_valid, validation_errors, created_at
            FROM csv_records
            WHERE upload_id = $1
            ORDER BY row_number ASC
            "#,
        )
        .bind(upload_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
