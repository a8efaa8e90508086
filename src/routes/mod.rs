//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/pets` - List and add pet listings
//! - `/api/health` - Health checks
//! - `/uploads` - Locally stored photos (local storage provider only)
//! - `/` - The listing page (form + cards)

pub mod health;
pub mod pets;
pub mod ui;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::StorageProvider;
use crate::middleware::apply_cors;
use crate::models::AppState;
use crate::storage::LocalObjectStore;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let config = state.config.clone();

    let mut router = Router::new()
        .merge(pets::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router());

    if config.storage.provider == StorageProvider::Local {
        info!(dir = %config.storage.upload_dir.display(), "Serving uploaded photos from disk");
        router = router.nest_service(
            LocalObjectStore::URL_PREFIX,
            ServeDir::new(&config.storage.upload_dir),
        );
    }

    let router = router
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &config.server)
}
