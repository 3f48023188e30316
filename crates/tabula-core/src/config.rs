//! Configuration module
//!
//! Service configuration is read from the environment (optionally seeded from a
//! `.env` file) and validated once at startup.

use std::env;

use crate::constants::DEFAULT_UPLOAD_ROLES;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const MIN_PRODUCTION_JWT_SECRET_LEN: usize = 32;

/// Settings shared by every HTTP service.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    pub log_format: Option<String>,
}

/// Ingestion service configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub allowed_upload_roles: Vec<String>,
    pub max_upload_size_bytes: usize,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn inner(&self) -> &IngestConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> Option<&str> {
        self.inner().base.log_format.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn allowed_upload_roles(&self) -> &[String] {
        &self.inner().allowed_upload_roles
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend.unwrap_or(StorageBackend::S3)
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    /// `S3_REGION`, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.inner()
            .s3_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let allowed_upload_roles = env::var("ALLOWED_UPLOAD_ROLES")
            .map(|raw| parse_list(&raw))
            .unwrap_or_else(|_| DEFAULT_UPLOAD_ROLES.iter().map(|r| r.to_string()).collect());

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|raw| raw.parse::<StorageBackend>())
            .transpose()?;

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins: parse_list(&cors_origins_str),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment,
            log_format: env::var("LOG_FORMAT").ok(),
        };

        Ok(IngestConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            allowed_upload_roles,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if is_production_env(&self.base.environment)
            && self.base.jwt_secret.len() < MIN_PRODUCTION_JWT_SECRET_LEN
        {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long in production",
                MIN_PRODUCTION_JWT_SECRET_LEN
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.allowed_upload_roles.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_UPLOAD_ROLES must name at least one role"
            ));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
