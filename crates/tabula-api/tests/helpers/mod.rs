//! Test helpers: build the router over in-memory storage and repositories.
//!
//! Run from workspace root: `cargo test -p tabula-api`.

#![allow(dead_code)]

pub mod auth;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::sync::Arc;
use tabula_api::constants;
use tabula_api::setup::routes;
use tabula_api::state::{AppState, FilesState, UploadPolicy};
use tabula_core::config::{BaseConfig, IngestConfig};
use tabula_core::{Config, StorageBackend};
use tabula_processing::test_helpers::{MockRowRecordRepository, MockStorage, MockUploadRepository};

/// Upload limit used by the test router.
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// API path prefix for tests (e.g. `/api/v1/files`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the in-memory collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MockStorage>,
    pub uploads: Arc<MockUploadRepository>,
    pub records: Arc<MockRowRecordRepository>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(
        MockStorage::new(),
        MockUploadRepository::new(),
        MockRowRecordRepository::new(),
    )
}

pub fn setup_test_app_with(
    storage: MockStorage,
    uploads: MockUploadRepository,
    records: MockRowRecordRepository,
) -> TestApp {
    let config = create_test_config();
    let storage = Arc::new(storage);
    let uploads = Arc::new(uploads);
    let records = Arc::new(records);

    let state = Arc::new(AppState {
        files: FilesState::new(uploads.clone(), records.clone(), storage.clone()),
        upload_policy: UploadPolicy::from_config(&config),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        uploads,
        records,
    }
}

fn create_test_config() -> Config {
    let base = BaseConfig {
        server_port: 4000,
        cors_origins: vec!["*".to_string()],
        db_max_connections: 5,
        db_timeout_seconds: 30,
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        environment: "test".to_string(),
        log_format: None,
    };
    Config(Box::new(IngestConfig {
        base,
        database_url: "postgres://localhost/tabula_test".to_string(),
        allowed_upload_roles: vec!["admin".to_string(), "uploader".to_string()],
        max_upload_size_bytes: TEST_MAX_UPLOAD_BYTES,
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some("/tmp/tabula-test".to_string()),
        local_storage_base_url: Some("http://localhost:4000/files".to_string()),
    }))
}

/// Multipart form carrying `content` as the `file` field.
pub fn csv_form(filename: &str, content: &[u8]) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::copy_from_slice(content))
        .file_name(filename.to_string())
        .mime_type("text/csv");
    MultipartForm::new().add_part("file", part)
}
