//! API constants

/// Prefix for versioned routes (e.g. `/api/v1/files`)
pub const API_PREFIX: &str = "/api/v1";

/// Path the OpenAPI document is served from
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Headroom on top of the file size limit for multipart framing and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;
