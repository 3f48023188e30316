//! Constants shared across crates.

/// Row number of the CSV header line. The first data row is `HEADER_ROW_NUMBER + 1`.
pub const HEADER_ROW_NUMBER: i32 = 1;

/// Number assigned to the first data row of a table.
pub const FIRST_DATA_ROW_NUMBER: i32 = HEADER_ROW_NUMBER + 1;

/// Content type used when storing CSV uploads.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Accepted upload extension (compared case-sensitively, like the filename check on upload).
pub const CSV_EXTENSION: &str = ".csv";

/// Prefix for all storage keys written by the ingestion pipeline.
pub const UPLOAD_KEY_PREFIX: &str = "uploads";

/// Roles allowed to upload when `ALLOWED_UPLOAD_ROLES` is not set.
pub const DEFAULT_UPLOAD_ROLES: &[&str] = &["admin", "uploader"];

/// Role that may read any user's uploads.
pub const ADMIN_ROLE: &str = "admin";
