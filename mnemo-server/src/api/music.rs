//! Music library listing

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::library::{scan_music_dir, TrackFile};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MusicFilesResponse {
    pub files: Vec<TrackFile>,
}

/// GET /api/music/files
pub async fn list_music_files(State(state): State<AppState>) -> ApiResult<Json<MusicFilesResponse>> {
    let files = scan_music_dir(&state.music_dir).await?;
    Ok(Json(MusicFilesResponse { files }))
}

pub fn music_routes() -> Router<AppState> {
    Router::new().route("/api/music/files", get(list_music_files))
}
