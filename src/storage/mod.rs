//! Object storage for listing photos.
//!
//! Photos are written once under a caller-generated key and never read back
//! by the service; clients fetch them directly through [`ObjectStore::public_url`].
//! Two backends exist:
//! - [`S3ObjectStore`] - an S3 (or S3-compatible) bucket
//! - [`LocalObjectStore`] - a directory on disk, served by the app at `/uploads`

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::{StorageConfig, StorageProvider};

pub mod local;
pub mod s3_client;

#[cfg(test)]
pub(crate) mod memory;

pub use local::LocalObjectStore;
pub use s3_client::S3ObjectStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage configuration error: {0}")]
    Config(String),

    #[error("upload of '{key}' failed: {reason}")]
    Upload { key: String, reason: String },

    #[error("delete of '{key}' failed: {reason}")]
    Delete { key: String, reason: String },

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A bucket-like blob store keyed by flat string keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`. An existing object with the same key is overwritten.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Public URL for `key`. Does not check that the object exists or is readable.
    fn public_url(&self, key: &str) -> String;

    fn provider(&self) -> &'static str;
}

/// Build the configured backend. Called once at startup; the handle is shared
/// by every request through `AppState`.
pub fn create_object_store(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider {
        StorageProvider::S3 => Arc::new(S3ObjectStore::from_config(config)?),
        StorageProvider::Local => Arc::new(LocalObjectStore::new(
            config.upload_dir.clone(),
            config.public_base_url.clone(),
        )),
    };
    Ok(store)
}

/// Keys are flat: one path segment, no traversal.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || key == "."
        || key.contains("..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
