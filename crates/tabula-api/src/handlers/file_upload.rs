use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tabula_core::constants::CSV_EXTENSION;
use tabula_core::models::FileUploadResponse;
use tabula_core::AppError;
use tabula_processing::CsvSubmission;

/// Fields of the upload form
#[derive(Debug)]
struct CsvForm {
    data: Vec<u8>,
    filename: String,
    category: Option<String>,
    description: Option<String>,
}

/// Blank text fields are treated as absent.
fn optional_text(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

async fn read_csv_form(mut multipart: Multipart, max_size: usize) -> Result<CsvForm, HttpAppError> {
    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut category = None;
    let mut description = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    )
                    .into());
                }
                let filename = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await?;
                file = Some((data.to_vec(), filename));
            }
            "category" => category = optional_text(field.text().await?),
            "description" => description = optional_text(field.text().await?),
            _ => {}
        }
    }

    let (data, filename) =
        file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    let filename = filename
        .filter(|name| name.ends_with(CSV_EXTENSION))
        .ok_or_else(|| AppError::InvalidInput("The file must be a CSV (.csv)".to_string()))?;

    if data.len() > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        ))
        .into());
    }

    Ok(CsvForm {
        data,
        filename,
        category,
        description,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/files/upload",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored and validated", body = FileUploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed to upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse),
        (status = 502, description = "Storage or processing failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    if !user.has_any_role(&state.upload_policy.allowed_roles) {
        return Err(AppError::Forbidden(format!(
            "Role '{}' is not allowed to upload files",
            user.role
        ))
        .into());
    }

    let form = read_csv_form(multipart, state.upload_policy.max_file_size).await?;

    tracing::info!(
        user_id = %user.user_id,
        filename = %form.filename,
        file_size = form.data.len(),
        "CSV upload received"
    );

    let started = Instant::now();
    let outcome = state
        .files
        .pipeline
        .ingest(CsvSubmission {
            content: form.data,
            filename: form.filename,
            user_id: user.user_id,
            category: form.category,
            description: form.description,
        })
        .await?;

    tracing::info!(
        upload_id = %outcome.upload_id,
        status = outcome.status.as_str(),
        row_count = outcome.records_count,
        duration_ms = started.elapsed().as_millis() as u64,
        "CSV upload processed"
    );

    Ok((
        StatusCode::CREATED,
        Json(FileUploadResponse::from(outcome)),
    ))
}
