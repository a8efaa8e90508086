// Error types shared by the service and HTTP layers

use axum::http::StatusCode;

use crate::listings::StoreError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Listing store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Response body for this error. Server-side failures are reported with
    /// `fallback` so internal details never reach the client.
    pub fn to_body(&self, fallback: &str) -> serde_json::Value {
        match self {
            AppError::MissingFields(fields) => serde_json::json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            AppError::InvalidRequest(message) | AppError::PayloadTooLarge(message) => {
                serde_json::json!({ "error": message })
            }
            _ => serde_json::json!({ "error": fallback }),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
