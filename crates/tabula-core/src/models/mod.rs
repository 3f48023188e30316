//! Data models for the application

mod row_record;
mod upload;
mod validation;

pub use row_record::*;
pub use upload::*;
pub use validation::*;
