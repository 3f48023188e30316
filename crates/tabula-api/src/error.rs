//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into `AppError` (storage, ingestion and repository errors) can be
//! propagated with `?` and renders as an `ErrorResponse` with the status code
//! from `ErrorMetadata`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tabula_core::{AppError, ErrorMetadata, LogLevel};
use tabula_processing::IngestError;
use tabula_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    /// Client-facing body for `error`; `detailed` adds the error chain and type.
    fn from_app_error(error: &AppError, detailed: bool) -> Self {
        Self {
            error: error.client_message(),
            details: detailed.then(|| error.detailed_message()),
            error_type: detailed.then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules keep us from implementing IntoResponse for the core type)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<IngestError> for HttpAppError {
    fn from(err: IngestError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::UploadFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

/// Body-limit rejections keep their 413; everything else is a malformed form.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production or for sensitive errors.
        let detailed = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, detailed);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: HttpAppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_from_storage_error_not_found() {
        let HttpAppError(app_err) = StorageError::NotFound("missing.csv".to_string()).into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "missing.csv"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let HttpAppError(app_err) = StorageError::UploadFailed("timeout".to_string()).into();
        assert!(matches!(app_err, AppError::Storage(ref msg) if msg == "timeout"));
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let HttpAppError(app_err) = StorageError::InvalidKey("../x".to_string()).into();
        assert!(matches!(app_err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_from_ingest_error_names_provider() {
        let err = IngestError::Storage {
            provider: "AWS S3".to_string(),
            message: "access denied".to_string(),
        };
        let HttpAppError(app_err) = err.into();
        assert_eq!(app_err.http_status_code(), 502);
        assert!(app_err.client_message().contains("AWS S3"));
    }

    #[tokio::test]
    async fn test_not_found_renders_details() {
        let (status, body) =
            render(HttpAppError(AppError::NotFound("Upload not found".to_string()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Upload not found");
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["recoverable"], false);
        assert_eq!(body["error_type"], "NotFound");
    }

    #[tokio::test]
    async fn test_sensitive_error_hides_details() {
        let (status, body) = render(HttpAppError(AppError::DatabaseMessage(
            "relation file_uploads does not exist".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["error"], "Failed to access database");
        assert!(body.get("details").is_none());
        assert!(body.get("error_type").is_none());
    }

    #[tokio::test]
    async fn test_forbidden_status() {
        let (status, body) =
            render(HttpAppError(AppError::Forbidden("role not allowed".to_string()))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }
}
