//! Tabula Storage Library
//!
//! Storage abstraction for uploaded CSV files, with S3 (via `object_store`) and
//! local filesystem backends.
//!
//! # Storage key format
//!
//! All backends use the same layout: `uploads/{YYYY}/{MM}/{DD}/{uuid}-{filename}`.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in
//! the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use tabula_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult, UploadMetadata};
