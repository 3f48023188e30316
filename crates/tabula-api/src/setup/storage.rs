//! Storage backend setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tabula_core::Config;
use tabula_storage::{create_storage, Storage};

/// Build the configured storage backend
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let backend = config.storage_backend();
    tracing::info!(backend = %backend, "Initializing storage backend");

    let storage = create_storage(config)
        .await
        .with_context(|| format!("Failed to initialize {} storage", backend.provider_name()))?;

    tracing::info!(
        backend = %backend,
        provider = backend.provider_name(),
        "Storage backend ready"
    );
    Ok(storage)
}
