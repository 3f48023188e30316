//! Database repositories for data access layer
//!
//! `upload` owns the `file_uploads` table, `row_record` owns `csv_records`.

pub mod row_record;
pub mod upload;

pub use row_record::PgRowRecordRepository;
pub use upload::PgUploadRepository;
