// PetPost - pet adoption listings with photos in object storage

pub mod config;
pub mod listings;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
pub mod types;
pub mod utils;

use std::sync::Arc;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

use listings::{ListingService, ListingStore};

/// Build the long-lived application state: one object store client and one
/// listing store, shared by every request handler.
pub fn build_state(config: Config) -> anyhow::Result<AppState> {
    let objects = storage::create_object_store(&config.storage)?;
    let store = Arc::new(ListingStore::new(
        config.data.document_path(),
        config.data.corrupt_policy,
    ));

    Ok(AppState {
        config: Arc::new(config),
        listings: ListingService::new(store, objects),
    })
}

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
