//! Global audio settings (background playlist and volume)

use axum::{extract::State, routing::get, Json, Router};
use mnemo_common::playlist::volume_from_value;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::db::settings;
use crate::error::ApiResult;
use crate::library::{name_set, scan_music_dir};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AudioSettingsResponse {
    pub global_playlist: Vec<String>,
    pub volume: f64,
}

/// PUT body; absent fields are left untouched, an explicit null is stored
/// as its coerced value (empty playlist, zero volume)
#[derive(Debug, Default, Deserialize)]
pub struct AudioSettingsUpdate {
    #[serde(default, deserialize_with = "present")]
    pub global_playlist: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub volume: Option<Value>,
}

/// Keep `null` as `Some(Value::Null)` instead of folding it into "absent"
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

async fn current_settings(state: &AppState) -> ApiResult<AudioSettingsResponse> {
    let files = scan_music_dir(&state.music_dir).await?;
    let order: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    let available = name_set(&files);

    Ok(AudioSettingsResponse {
        global_playlist: settings::get_global_playlist(&state.db, &order, &available).await?,
        volume: settings::get_volume(&state.db).await?,
    })
}

/// GET /api/audio/settings
pub async fn get_audio_settings(State(state): State<AppState>) -> ApiResult<Json<AudioSettingsResponse>> {
    Ok(Json(current_settings(&state).await?))
}

/// PUT /api/audio/settings
pub async fn put_audio_settings(
    State(state): State<AppState>,
    Json(update): Json<AudioSettingsUpdate>,
) -> ApiResult<Json<AudioSettingsResponse>> {
    if let Some(raw) = &update.global_playlist {
        let available = name_set(&scan_music_dir(&state.music_dir).await?);
        let stored = settings::set_global_playlist(&state.db, raw, &available).await?;
        info!("Global playlist saved ({} tracks)", stored.len());
    }

    if let Some(raw) = &update.volume {
        let stored = settings::set_volume(&state.db, volume_from_value(raw)).await?;
        info!("Global volume saved: {:.2}", stored);
    }

    Ok(Json(current_settings(&state).await?))
}

pub fn audio_settings_routes() -> Router<AppState> {
    Router::new().route(
        "/api/audio/settings",
        get(get_audio_settings).put(put_audio_settings),
    )
}
