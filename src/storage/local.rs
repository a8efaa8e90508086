// Filesystem object store for local development.
// Objects land in `upload_dir` and are served by the app under `/uploads`.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use super::{validate_key, ObjectStore, StorageError, StorageResult};

pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub const URL_PREFIX: &'static str = "/uploads";

    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        validate_key(key)?;
        fs::create_dir_all(&self.root).await?;

        let path = self.root.join(key);
        debug!(path = %path.display(), size = data.len(), content_type, "Writing object");
        fs::write(&path, &data).await.map_err(|e| StorageError::Upload {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{}/{}", self.public_base_url, Self::URL_PREFIX, key)
    }

    fn provider(&self) -> &'static str {
        "local"
    }
}
