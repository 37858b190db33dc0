//! Memory CRUD endpoints
//!
//! Create and update accept `multipart/form-data` so an image can travel with
//! the text fields. `music_playlist` is a JSON array encoded as a form field.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use mnemo_common::emotion::DEFAULT_EMOTION;
use mnemo_common::playlist::{parse_playlist_text, sanitize_playlist};
use mnemo_common::time::now_rfc3339;
use mnemo_common::{Error, Memory};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::memories::{self as store, MemoryValues};
use crate::error::ApiResult;
use crate::library::{name_set, scan_music_dir};
use crate::uploads::store_upload;
use crate::AppState;

/// Fields submitted by the memory editor
///
/// Empty text fields are normalized to `None`.
#[derive(Debug, Default)]
pub struct MemoryForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub emotion: Option<String>,
    pub memory_date: Option<String>,
    pub music_playlist: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl MemoryForm {
    /// Drain a multipart body; unknown fields are ignored
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = MemoryForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    form.image = Some(ImageUpload { file_name, bytes });
                }
                continue;
            }

            let text = field.text().await?;
            let value = Some(text).filter(|t| !t.is_empty());
            match name.as_str() {
                "title" => form.title = value,
                "content" => form.content = value,
                "emotion" => form.emotion = value,
                "memory_date" => form.memory_date = value,
                "music_playlist" => form.music_playlist = value,
                other => debug!("Ignoring unknown form field '{}'", other),
            }
        }

        Ok(form)
    }
}

async fn load_memory(state: &AppState, id: &str) -> ApiResult<Memory> {
    store::get_memory(&state.db, id)
        .await?
        .map(Memory::from)
        .ok_or_else(|| Error::memory_not_found(id).into())
}

/// Parse and sanitize a submitted playlist against the current library
async fn submitted_playlist(state: &AppState, raw: Option<&str>, fallback: &[String]) -> ApiResult<Vec<String>> {
    let available = name_set(&scan_music_dir(&state.music_dir).await?);
    let parsed = match raw {
        Some(text) => parse_playlist_text(text, fallback),
        None => fallback.to_vec(),
    };
    Ok(sanitize_playlist(&parsed, Some(&available)))
}

async fn save_image(state: &AppState, image: Option<ImageUpload>) -> ApiResult<Option<String>> {
    match image {
        Some(upload) => Ok(Some(
            store_upload(&state.uploads_dir, &upload.file_name, &upload.bytes).await?,
        )),
        None => Ok(None),
    }
}

/// GET /api/memories
pub async fn list_memories(State(state): State<AppState>) -> ApiResult<Json<Vec<Memory>>> {
    let rows = store::list_memories(&state.db).await?;
    Ok(Json(rows.into_iter().map(Memory::from).collect()))
}

/// GET /api/memories/:id
pub async fn get_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Memory>> {
    Ok(Json(load_memory(&state, &id).await?))
}

/// POST /api/memories
pub async fn create_memory(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Memory>)> {
    let form = MemoryForm::from_multipart(multipart).await?;

    let (Some(title), Some(content)) = (form.title, form.content) else {
        return Err(Error::InvalidMemory("title and content are required".to_string()).into());
    };

    let values = MemoryValues {
        title,
        content,
        emotion: form.emotion.unwrap_or_else(|| DEFAULT_EMOTION.to_string()),
        music_playlist: submitted_playlist(&state, form.music_playlist.as_deref(), &[]).await?,
        memory_date: Some(form.memory_date.unwrap_or_else(now_rfc3339)),
        image: save_image(&state, form.image).await?,
    };

    let id = Uuid::new_v4().to_string();
    store::insert_memory(&state.db, &id, &values).await?;
    info!("Created memory {} ({} tracks)", id, values.music_playlist.len());

    Ok((StatusCode::CREATED, Json(load_memory(&state, &id).await?)))
}

/// PUT /api/memories/:id
pub async fn update_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<Memory>> {
    let form = MemoryForm::from_multipart(multipart).await?;
    let existing = load_memory(&state, &id).await?;

    let image = match save_image(&state, form.image).await? {
        Some(path) => Some(path),
        None => existing.image,
    };

    let values = MemoryValues {
        title: form.title.unwrap_or(existing.title),
        content: form.content.unwrap_or(existing.content),
        emotion: form.emotion.unwrap_or(existing.emotion),
        music_playlist: submitted_playlist(
            &state,
            form.music_playlist.as_deref(),
            &existing.music_playlist,
        )
        .await?,
        memory_date: form.memory_date.or(existing.memory_date),
        image,
    };

    if !store::update_memory(&state.db, &id, &values).await? {
        return Err(Error::memory_not_found(id).into());
    }
    info!("Updated memory {}", id);

    Ok(Json(load_memory(&state, &id).await?))
}

/// DELETE /api/memories/:id
pub async fn delete_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !store::delete_memory(&state.db, &id).await? {
        return Err(Error::memory_not_found(id).into());
    }
    info!("Deleted memory {}", id);

    Ok(Json(json!({ "message": "Memory deleted" })))
}

pub fn memory_routes() -> Router<AppState> {
    Router::new()
        .route("/api/memories", get(list_memories).post(create_memory))
        .route(
            "/api/memories/:id",
            get(get_memory).put(update_memory).delete(delete_memory),
        )
}
