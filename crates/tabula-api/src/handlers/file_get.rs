use crate::auth::AuthUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tabula_core::models::{RowRecordResponse, UploadRecord, UploadResponse};
use tabula_core::AppError;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fetch an upload the caller may see. Uploads owned by someone else are
/// reported as missing so their existence is not disclosed.
async fn visible_upload(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> Result<UploadRecord, HttpAppError> {
    let upload = state
        .files
        .uploads
        .get(id)
        .await?
        .filter(|upload| user.can_access(upload.user_id))
        .ok_or_else(|| AppError::NotFound("Upload not found".to_string()))?;
    Ok(upload)
}

#[utoipa::path(
    get,
    path = "/api/v1/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Upload found", body = UploadResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = visible_upload(&state, &user, id).await?;
    Ok(Json(UploadResponse::from(upload)))
}

#[derive(Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[utoipa::path(
    get,
    path = "/api/v1/files",
    tag = "files",
    params(
        PaginationQuery
    ),
    responses(
        (status = 200, description = "The caller's uploads, newest first", body = Vec<UploadResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = pagination.limit.clamp(1, MAX_PAGE_SIZE);
    let offset = pagination.offset.max(0);

    let uploads = state
        .files
        .uploads
        .list_by_user(user.user_id, limit, offset)
        .await?;

    let responses: Vec<UploadResponse> = uploads.into_iter().map(UploadResponse::from).collect();
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/v1/files/{id}/records",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Rows of the upload in file order", body = Vec<RowRecordResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_file_records(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = visible_upload(&state, &user, id).await?;

    let records = state.files.records.list_by_upload(upload.id).await?;
    tracing::debug!(upload_id = %upload.id, row_count = records.len(), "Listed upload records");

    let responses: Vec<RowRecordResponse> =
        records.into_iter().map(RowRecordResponse::from).collect();
    Ok(Json(responses))
}
