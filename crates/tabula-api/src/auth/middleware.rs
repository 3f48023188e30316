use crate::auth::jwt::JwtVerifier;
use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tabula_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: JwtVerifier,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            verifier: JwtVerifier::new(jwt_secret),
        }
    }
}

fn unauthorized(message: &str) -> Response {
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Validates `Authorization: Bearer <jwt>` and stores the caller as an `AuthUser` extension.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => return unauthorized("Missing authorization header"),
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return unauthorized("Invalid authorization header format");
    };

    let claims = match auth_state.verifier.verify(token.trim()) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    let user = AuthUser::from(claims);
    tracing::debug!(user_id = %user.user_id, role = %user.role, "Request authenticated");
    request.extensions_mut().insert(user);

    next.run(request).await
}
