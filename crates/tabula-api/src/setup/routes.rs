//! Route configuration and setup

use crate::auth::{auth_middleware, AuthState};
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH};
use crate::handlers::file_get::{get_file, list_file_records, list_files};
use crate::handlers::file_upload::upload_file;
use crate::handlers::health::health_check;
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tabula_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

/// Build the application router
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(config.jwt_secret()));

    let app = public_routes()
        .nest(API_PREFIX, protected_routes(auth_state))
        .merge(RapiDoc::new(OPENAPI_PATH).path("/docs"))
        .layer(RequestBodyLimitLayer::new(
            config.max_upload_size_bytes() + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// File routes behind bearer authentication
fn protected_routes(auth_state: Arc<AuthState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/files/upload", post(upload_file))
        .route("/files", get(list_files))
        .route("/files/{id}", get(get_file))
        .route("/files/{id}/records", get(list_file_records))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
}
