/// API route modules
pub mod albums;
pub mod artists;
pub mod health;

use crate::{error::AppError, state::AppState};
use axum::{http::Uri, routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

/// Build the query service router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/artists", get(artists::list_artists))
        .route("/artists/:id/albums", get(artists::list_albums))
        .route("/albums/:id/songs", get(albums::list_songs))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(app_state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
