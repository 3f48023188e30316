//! In-memory collaborators for tests
//!
//! Available to this crate's tests and, through the `test-helpers` feature, to
//! downstream crates' test suites.

mod mock_repositories;
mod mock_storage;

pub use mock_repositories::{MockRowRecordRepository, MockUploadRepository};
pub use mock_storage::MockStorage;
