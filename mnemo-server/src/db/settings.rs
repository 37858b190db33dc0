//! Settings database access
//!
//! Key-value store with JSON-encoded values. A value that fails to parse is
//! treated the same as a missing one.

use mnemo_common::playlist::{clamp_volume, parse_playlist, sanitize_playlist, DEFAULT_VOLUME};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Pool, Sqlite};
use std::collections::HashSet;
use tracing::{debug, warn};

pub const GLOBAL_PLAYLIST_KEY: &str = "global_playlist";
pub const GLOBAL_VOLUME_KEY: &str = "global_volume";

/// Generic setting getter
///
/// Returns `None` when the key is absent or its value is not valid JSON for `T`.
pub async fn get_setting<T: DeserializeOwned>(db: &Pool<Sqlite>, key: &str) -> sqlx::Result<Option<T>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    Ok(value.and_then(|text| match serde_json::from_str::<T>(&text) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring unparseable setting '{}': {}", key, e);
            None
        }
    }))
}

/// Generic setting setter (insert or update)
pub async fn set_setting<T: Serialize + ?Sized>(db: &Pool<Sqlite>, key: &str, value: &T) -> sqlx::Result<()> {
    let value_str = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());

    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value_str)
    .execute(db)
    .await?;

    Ok(())
}

/// Stored volume in [0, 1], 0.3 when unset
pub async fn get_volume(db: &Pool<Sqlite>) -> sqlx::Result<f64> {
    Ok(get_setting::<Value>(db, GLOBAL_VOLUME_KEY)
        .await?
        .and_then(|v| v.as_f64())
        .map(clamp_volume)
        .unwrap_or(DEFAULT_VOLUME))
}

/// Persist a volume; callers pass the raw parsed number
pub async fn set_volume(db: &Pool<Sqlite>, volume: f64) -> sqlx::Result<f64> {
    let clamped = clamp_volume(volume);
    set_setting(db, GLOBAL_VOLUME_KEY, &clamped).await?;
    Ok(clamped)
}

/// Global playlist normalized against `library`
///
/// Writes the normalized list back when it differs from what was stored. An
/// empty result is replaced (and stored) by the whole library in `library_order`.
pub async fn get_global_playlist(
    db: &Pool<Sqlite>,
    library_order: &[String],
    library: &HashSet<String>,
) -> sqlx::Result<Vec<String>> {
    let saved = get_setting::<Value>(db, GLOBAL_PLAYLIST_KEY).await?;
    let normalized = sanitize_playlist(&parse_playlist(saved.as_ref(), &[]), Some(library));

    if normalized.is_empty() {
        let default_playlist = library_order.to_vec();
        debug!("Global playlist empty, defaulting to {} library tracks", default_playlist.len());
        set_setting(db, GLOBAL_PLAYLIST_KEY, &default_playlist).await?;
        return Ok(default_playlist);
    }

    let unchanged = saved.as_ref() == Some(&Value::from(normalized.clone()));
    if !unchanged {
        debug!("Persisting normalized global playlist ({} tracks)", normalized.len());
        set_setting(db, GLOBAL_PLAYLIST_KEY, &normalized).await?;
    }

    Ok(normalized)
}

/// Store a playlist after sanitizing it against `library`
pub async fn set_global_playlist(
    db: &Pool<Sqlite>,
    raw: &Value,
    library: &HashSet<String>,
) -> sqlx::Result<Vec<String>> {
    let normalized = sanitize_playlist(&parse_playlist(Some(raw), &[]), Some(library));
    set_setting(db, GLOBAL_PLAYLIST_KEY, &normalized).await?;
    Ok(normalized)
}
