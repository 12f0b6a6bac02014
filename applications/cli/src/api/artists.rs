/// Artist API routes
use crate::{error::Result, state::AppState};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use musiclib_core::{Album, Artist, ArtistId};

/// GET /artists - ordered by sort name
pub async fn list_artists(State(app_state): State<AppState>) -> Result<Json<Vec<Artist>>> {
    let artists = app_state.store.list_artists().await?;
    Ok(Json(artists))
}

/// GET /artists/:id/albums - ordered by sort title
pub async fn list_albums(
    id: std::result::Result<Path<ArtistId>, PathRejection>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Album>>> {
    let Path(id) = id?;
    let albums = app_state.store.list_albums(id).await?;
    Ok(Json(albums))
}
