//! Tabula Processing Library
//!
//! CSV decoding, the row-level validation checks, the validation engine that
//! turns them into a report, and the ingestion pipeline that stores a file,
//! validates it and persists one record per data row.

pub mod ingest;
pub mod table;
pub mod validation;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use ingest::{CsvSubmission, IngestError, IngestionOutcome, IngestionPipeline};
pub use table::{parse_table, CsvTable, ParseError, ParsedRow, RowReader};
pub use validation::validate_csv;
