//! mnemo-server library - memory journal HTTP service
//!
//! REST endpoints for memories, the music library and audio settings, plus
//! static serving of the front end, uploaded images and music files.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use mnemo_common::config::RootFolderInitializer;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod library;
pub mod uploads;

pub use error::{ApiError, ApiResult};

/// Largest accepted multipart body (memory form with image)
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Static front end root
    pub public_dir: PathBuf,
    /// Track library folder (served under /music)
    pub music_dir: PathBuf,
    /// Uploaded images (served under /uploads)
    pub uploads_dir: PathBuf,
}

impl AppState {
    /// Create application state for the given on-disk layout
    pub fn new(db: SqlitePool, layout: &RootFolderInitializer) -> Self {
        Self {
            db,
            public_dir: layout.public_dir(),
            music_dir: layout.music_dir(),
            uploads_dir: layout.uploads_dir(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.public_dir);
    let uploads = ServeDir::new(&state.uploads_dir);
    let music = ServeDir::new(&state.music_dir);

    Router::new()
        .merge(api::memory_routes())
        .merge(api::music_routes())
        .merge(api::audio_settings_routes())
        .merge(api::health_routes())
        .nest_service("/uploads", uploads)
        .nest_service("/music", music)
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
