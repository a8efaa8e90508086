//! File-backed listing store
//!
//! The whole collection lives in one pretty-printed JSON document. Every write
//! replaces the document through a temp file and a rename, so readers see either
//! the old or the new collection and never a partial one. Appends hold a store-wide
//! lock across their read-modify-write.

use std::path::PathBuf;

use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::CorruptPolicy;
use crate::models::{Listing, PetCollection};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("listing document {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize listings: {0}")]
    Serialize(serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

enum Document {
    Missing,
    Present(PetCollection),
    Corrupt(serde_json::Error),
}

pub struct ListingStore {
    path: PathBuf,
    policy: CorruptPolicy,
    write_lock: Mutex<()>,
}

impl ListingStore {
    pub fn new(path: impl Into<PathBuf>, policy: CorruptPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Return the persisted collection, or an empty one if nothing has been written yet.
    pub async fn read_all(&self) -> StoreResult<PetCollection> {
        self.ensure_dir().await?;
        match self.load().await? {
            Document::Missing => Ok(PetCollection::default()),
            Document::Present(collection) => Ok(collection),
            Document::Corrupt(source) => {
                self.check_policy(source)?;
                Ok(PetCollection::default())
            }
        }
    }

    /// Replace the persisted collection wholesale.
    pub async fn write_all(&self, collection: &PetCollection) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_dir().await?;
        if let Document::Corrupt(_) = self.load().await? {
            self.quarantine().await?;
        }
        self.persist(collection).await
    }

    /// Append one listing and return the collection as written.
    pub async fn append(&self, listing: Listing) -> StoreResult<PetCollection> {
        let _guard = self.write_lock.lock().await;
        self.ensure_dir().await?;

        let mut collection = match self.load().await? {
            Document::Missing => PetCollection::default(),
            Document::Present(collection) => collection,
            Document::Corrupt(source) => {
                self.check_policy(source)?;
                self.quarantine().await?;
                PetCollection::default()
            }
        };

        collection.pets.push(listing);
        self.persist(&collection).await?;
        debug!(count = collection.len(), "Listing appended");
        Ok(collection)
    }

    async fn ensure_dir(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    async fn load(&self) -> StoreResult<Document> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::Missing),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(collection) => Ok(Document::Present(collection)),
            Err(e) => Ok(Document::Corrupt(e)),
        }
    }

    fn check_policy(&self, source: serde_json::Error) -> StoreResult<()> {
        match self.policy {
            CorruptPolicy::Empty => {
                warn!(
                    path = %self.path.display(),
                    error = %source,
                    "Listing document is corrupt, treating collection as empty"
                );
                Ok(())
            }
            CorruptPolicy::Fail => Err(StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Move a corrupt document aside so the next write does not destroy it.
    async fn quarantine(&self) -> StoreResult<PathBuf> {
        let target = self.sibling(&format!(
            "{}.corrupt-{}",
            self.file_name(),
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        ));
        fs::rename(&self.path, &target).await?;
        warn!(
            from = %self.path.display(),
            to = %target.display(),
            "Moved corrupt listing document aside"
        );
        Ok(target)
    }

    async fn persist(&self, collection: &PetCollection) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(collection).map_err(StoreError::Serialize)?;
        let tmp = self.sibling(&format!(".{}.{}.tmp", self.file_name(), uuid::Uuid::new_v4()));

        fs::write(&tmp, content).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        info!(path = %self.path.display(), count = collection.len(), "Saved listings");
        Ok(())
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pets.json".to_string())
    }

    fn sibling(&self, name: &str) -> PathBuf {
        self.path.with_file_name(name)
    }
}
