//! CSV ingestion pipeline

pub mod pipeline;
pub mod types;

pub use pipeline::IngestionPipeline;
pub use types::{CsvSubmission, IngestError, IngestionOutcome, PROCESSING_SERVICE};
