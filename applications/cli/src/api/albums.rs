/// Album API routes
use crate::{error::Result, state::AppState};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use musiclib_core::{AlbumId, Song};

/// GET /albums/:id/songs - ordered by disc, then track
pub async fn list_songs(
    id: std::result::Result<Path<AlbumId>, PathRejection>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Song>>> {
    let Path(id) = id?;
    let songs = app_state.store.list_songs(id).await?;
    Ok(Json(songs))
}
