//! Listing service: the add and read-all operations behind `/api/pets`.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, warn};
use validator::Validate;

use super::keys::{resolve_content_type, storage_key};
use super::ListingStore;
use crate::models::{Listing, PetCollection};
use crate::storage::ObjectStore;
use crate::types::{AppError, AppResult};

/// Photo part of a submission, as received.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Raw form fields of an add-listing request. Nothing is trusted yet.
#[derive(Debug, Clone, Default)]
pub struct ListingSubmission {
    pub photo: Option<PhotoUpload>,
    pub name: Option<String>,
    pub age: Option<String>,
    pub breed: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Validate)]
struct NewListing {
    #[validate(length(min = 1, max = 100))]
    name: String,
    age: u32,
    #[validate(length(min = 1, max = 100))]
    breed: String,
    #[validate(length(max = 2000))]
    description: String,
}

/// A field counts as present when it has non-whitespace content. The value
/// itself is kept as submitted.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ListingSubmission {
    fn validate(self) -> AppResult<(PhotoUpload, NewListing)> {
        let photo = self.photo.filter(|p| !p.data.is_empty());
        let name = non_blank(self.name);
        let age = non_blank(self.age);
        let breed = non_blank(self.breed);

        let mut missing = Vec::new();
        if photo.is_none() {
            missing.push("file");
        }
        if name.is_none() {
            missing.push("name");
        }
        if age.is_none() {
            missing.push("age");
        }
        if breed.is_none() {
            missing.push("breed");
        }

        let (Some(photo), Some(name), Some(age), Some(breed)) = (photo, name, age, breed) else {
            return Err(AppError::MissingFields(missing));
        };

        let age: u32 = age.trim().parse().map_err(|_| {
            AppError::InvalidRequest("age must be a non-negative whole number".to_string())
        })?;

        let listing = NewListing {
            name,
            age,
            breed,
            description: self.description.unwrap_or_default(),
        };
        listing.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            AppError::InvalidRequest(format!("invalid length for: {}", fields.join(", ")))
        })?;

        Ok((photo, listing))
    }
}

/// Long-lived handle shared by every request through `AppState`.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<ListingStore>,
    objects: Arc<dyn ObjectStore>,
}

impl ListingService {
    pub fn new(store: Arc<ListingStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, objects }
    }

    pub fn storage_provider(&self) -> &'static str {
        self.objects.provider()
    }

    pub async fn list_all(&self) -> AppResult<PetCollection> {
        Ok(self.store.read_all().await?)
    }

    /// Validate, upload the photo, then append the listing.
    ///
    /// Nothing is written anywhere when validation fails, and the store is not
    /// touched when the upload fails. If the append fails after a successful
    /// upload, the photo is deleted again.
    pub async fn add_listing(&self, submission: ListingSubmission) -> AppResult<Listing> {
        let (photo, new_listing) = submission.validate()?;

        let content_type =
            resolve_content_type(photo.content_type.as_deref(), photo.file_name.as_deref());
        let key = storage_key(photo.file_name.as_deref(), &content_type);

        self.objects
            .put_object(&key, photo.data, &content_type)
            .await?;

        let listing = Listing {
            id: uuid::Uuid::new_v4(),
            name: new_listing.name,
            age: new_listing.age,
            breed: new_listing.breed,
            description: new_listing.description,
            image_url: self.objects.public_url(&key),
            added_at: Listing::now(),
        };

        if let Err(e) = self.store.append(listing.clone()).await {
            error!(key = %key, error = %e, "Failed to persist listing, removing uploaded photo");
            if let Err(cleanup) = self.objects.delete_object(&key).await {
                warn!(key = %key, error = %cleanup, "Uploaded photo is now orphaned");
            }
            return Err(e.into());
        }

        info!(id = %listing.id, name = %listing.name, key = %key, "Listing added");
        Ok(listing)
    }
}
