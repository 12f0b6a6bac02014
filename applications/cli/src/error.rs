/// Application error types
use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use musiclib_core::LibraryError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Import error: {0}")]
    Import(#[from] musiclib_importer::ImportError),

    #[error("Tag error: {0}")]
    Tag(#[from] musiclib_tags::TagError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<musiclib_storage::StorageError> for AppError {
    fn from(err: musiclib_storage::StorageError) -> Self {
        // StorageError -> LibraryError -> AppError
        AppError::Library(err.into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Library(LibraryError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                format!("{} {} not found", entity, id),
            ),
            AppError::Library(LibraryError::InvalidInput(msg)) => (StatusCode::BAD_REQUEST, msg),
            AppError::Library(ref e) => {
                tracing::error!("Library error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ref other => {
                tracing::error!("Internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
