//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tabula_core::models;

/// Registers the bearer JWT scheme referenced by the file routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tabula API",
        version = "0.1.0",
        description = "CSV ingestion and validation API (v1). Uploaded files are stored in object storage, checked for empty values, type errors, duplicates and malformed rows, and persisted row by row. File endpoints are versioned under /api/v1/."
    ),
    paths(
        handlers::file_upload::upload_file,
        handlers::file_get::get_file,
        handlers::file_get::list_files,
        handlers::file_get::list_file_records,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::FileUploadResponse,
            models::UploadResponse,
            models::RowRecordResponse,
            models::UploadStatus,
            models::ValidationFinding,
            models::ValidationType,
            models::Severity,
            handlers::file_get::PaginationQuery,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "files", description = "CSV upload, validation report and row records"),
        (name = "health", description = "Service liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_file_routes() {
        let spec = get_openapi_spec();
        for path in [
            "/api/v1/files/upload",
            "/api/v1/files",
            "/api/v1/files/{id}",
            "/api/v1/files/{id}/records",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_openapi_registers_bearer_scheme() {
        let spec = get_openapi_spec();
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
