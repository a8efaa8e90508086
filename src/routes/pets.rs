//! Pet listing endpoints
//!
//! - GET /api/pets - The full collection, `{ "pets": [...] }`
//! - POST /api/pets - Add a listing from a multipart form
//!   (`file`, `name`, `age`, `breed`, optional `description`)

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{debug, error, info, warn};

use crate::listings::{ListingSubmission, PhotoUpload};
use crate::models::{AddListingResponse, AppState};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/pets", get(list_pets).post(add_pet))
        .with_state(state)
}

/// GET /api/pets - Fetch all pets
async fn list_pets(State(state): State<AppState>) -> impl IntoResponse {
    match state.listings.list_all().await {
        Ok(collection) => (StatusCode::OK, Json(collection)).into_response(),
        Err(e) => {
            error!("Error reading pets data: {}", e);
            (e.status_code(), Json(e.to_body("Failed to fetch pets"))).into_response()
        }
    }
}

/// POST /api/pets - Add a new pet
async fn add_pet(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let result = match multipart {
        Ok(multipart) => match read_submission(multipart).await {
            Ok(submission) => state.listings.add_listing(submission).await,
            Err(e) => Err(e),
        },
        Err(rejection) => Err(AppError::InvalidRequest(rejection.body_text())),
    };

    match result {
        Ok(pet) => {
            info!(id = %pet.id, "Pet added");
            (
                StatusCode::OK,
                Json(AddListingResponse { success: true, pet }),
            )
                .into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected pet submission: {}", e);
            } else {
                error!("Error adding pet: {}", e);
            }
            (e.status_code(), Json(e.to_body("Failed to add pet"))).into_response()
        }
    }
}

async fn read_submission(mut multipart: Multipart) -> AppResult<ListingSubmission> {
    let mut submission = ListingSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                debug!(?file_name, size = data.len(), "Received photo");
                submission.photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "name" => submission.name = Some(text(field).await?),
            "age" => submission.age = Some(text(field).await?),
            "breed" => submission.breed = Some(text(field).await?),
            "description" => submission.description = Some(text(field).await?),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(submission)
}

async fn text(field: Field<'_>) -> AppResult<String> {
    field.text().await.map_err(multipart_error)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::InvalidRequest(format!("Malformed form data: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::super::create_router;
    use super::super::test_support::{json_body, multipart_request, test_state};
    use crate::storage::memory::MemoryObjectStore;

    const JPEG: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg-data";

    fn get_pets() -> Request<Body> {
        Request::builder()
            .uri("/api/pets")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(dir.path(), Arc::new(MemoryObjectStore::new()), &[]));

        let response = app.oneshot(get_pets()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({ "pets": [] }));
    }

    #[tokio::test]
    async fn test_add_buddy_then_list() {
        let dir = TempDir::new().unwrap();
        let objects = Arc::new(MemoryObjectStore::new());
        let app = create_router(test_state(dir.path(), objects.clone(), &[]));

        let request = multipart_request(
            &[
                ("name", "Buddy"),
                ("age", "3"),
                ("breed", "Golden Retriever"),
                ("description", ""),
            ],
            Some(("buddy.jpg", "image/jpeg", JPEG)),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        let pet = &body["pet"];
        assert_eq!(pet["name"], "Buddy");
        assert_eq!(pet["age"], 3);
        assert_eq!(pet["breed"], "Golden Retriever");
        assert_eq!(pet["description"], "");
        assert!(pet["imageUrl"].as_str().unwrap().ends_with(".jpg"));
        assert!(pet["id"].as_str().is_some());
        assert!(pet["addedAt"].as_str().is_some());

        let key = objects.keys().pop().unwrap();
        assert_eq!(objects.get(&key).unwrap().data.as_ref(), JPEG);

        let listed = json_body(app.oneshot(get_pets()).await.unwrap()).await;
        assert_eq!(listed["pets"], serde_json::json!([pet.clone()]));
    }

    #[tokio::test]
    async fn test_missing_fields_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let objects = Arc::new(MemoryObjectStore::new());
        let app = create_router(test_state(dir.path(), objects.clone(), &[]));

        let request = multipart_request(&[("name", "Buddy"), ("age", "3")], None);
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Missing required fields");
        assert_eq!(body["fields"], serde_json::json!(["file", "breed"]));

        assert!(objects.keys().is_empty());
        let listed = json_body(app.oneshot(get_pets()).await.unwrap()).await;
        assert_eq!(listed["pets"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_non_numeric_age_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(dir.path(), Arc::new(MemoryObjectStore::new()), &[]));

        let request = multipart_request(
            &[("name", "Buddy"), ("age", "three"), ("breed", "Beagle")],
            Some(("buddy.jpg", "image/jpeg", JPEG)),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(dir.path(), Arc::new(MemoryObjectStore::new()), &[]));

        let request = Request::builder()
            .method("POST")
            .uri("/api/pets")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Buddy"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_upload_failure_is_server_error() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(dir.path(), Arc::new(MemoryObjectStore::failing()), &[]));

        let request = multipart_request(
            &[("name", "Buddy"), ("age", "3"), ("breed", "Beagle")],
            Some(("buddy.jpg", "image/jpeg", JPEG)),
        );
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Failed to add pet" })
        );
        let listed = json_body(app.oneshot(get_pets()).await.unwrap()).await;
        assert_eq!(listed["pets"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_corrupt_document_with_fail_policy() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data").join("pets.json"), "{{{").unwrap();
        let app = create_router(test_state(
            dir.path(),
            Arc::new(MemoryObjectStore::new()),
            &[("CORRUPT_DOCUMENT_POLICY", "fail")],
        ));

        let response = app.oneshot(get_pets()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Failed to fetch pets" })
        );
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let dir = TempDir::new().unwrap();
        let objects = Arc::new(MemoryObjectStore::new());
        let app = create_router(test_state(
            dir.path(),
            objects.clone(),
            &[("MAX_UPLOAD_BYTES", "256")],
        ));

        let big = vec![0xAB_u8; 4096];
        let request = multipart_request(
            &[("name", "Buddy"), ("age", "3"), ("breed", "Beagle")],
            Some(("buddy.jpg", "image/jpeg", big.as_slice())),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(objects.keys().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_posts_both_persist() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(dir.path(), Arc::new(MemoryObjectStore::new()), &[]));

        let first = multipart_request(
            &[("name", "Buddy"), ("age", "3"), ("breed", "Golden Retriever")],
            Some(("buddy.jpg", "image/jpeg", JPEG)),
        );
        let second = multipart_request(
            &[("name", "Luna"), ("age", "2"), ("breed", "Husky")],
            Some(("luna.png", "image/png", &b"png"[..])),
        );

        let (a, b) = tokio::join!(app.clone().oneshot(first), app.clone().oneshot(second));
        assert_eq!(a.unwrap().status(), StatusCode::OK);
        assert_eq!(b.unwrap().status(), StatusCode::OK);

        let listed = json_body(app.oneshot(get_pets()).await.unwrap()).await;
        let mut names: Vec<_> = listed["pets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Buddy".to_string(), "Luna".to_string()]);
    }
}
