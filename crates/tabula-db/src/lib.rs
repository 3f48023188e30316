//! Tabula Database Layer
//!
//! Postgres repositories for uploads and their per-row records, plus the
//! repository traits the ingestion pipeline is written against.

pub mod db;
pub mod traits;

pub use db::{PgRowRecordRepository, PgUploadRepository};
pub use traits::{RowRecordRepository, UploadRepository};
