//! CSV validation: the individual row checks and the engine that assembles them into a report.

pub mod checks;
pub mod engine;

pub use engine::validate_csv;
