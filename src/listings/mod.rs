//! Pet listings
//!
//! - [`ListingStore`] persists the whole collection as one JSON document
//! - [`ListingService`] validates submissions, uploads photos and appends listings
//! - [`keys`] derives storage keys and content types for uploaded photos

pub mod keys;
pub mod service;
pub mod store;

pub use service::{ListingService, ListingSubmission, PhotoUpload};
pub use store::{ListingStore, StoreError, StoreResult};

use serde::Deserialize;

/// What to do when the listing document exists but cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Log, treat the collection as empty, and move the bad file aside on the next write.
    #[default]
    Empty,
    /// Refuse to read or append until an operator repairs the document.
    Fail,
}

impl std::str::FromStr for CorruptPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(CorruptPolicy::Empty),
            "fail" => Ok(CorruptPolicy::Fail),
            other => Err(anyhow::anyhow!(
                "unknown corrupt document policy '{}' (expected 'empty' or 'fail')",
                other
            )),
        }
    }
}
