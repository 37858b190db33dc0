//! Database initialization
//!
//! Creates the database file on first run and brings the schema up to date.
//! Every step is idempotent and runs on each startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// A single connection is used so every query sees the same database.
pub async fn open_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    initialize_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables and apply column additions
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    create_memories_table(pool).await?;
    create_settings_table(pool).await?;

    // Databases created before per-memory playlists lack this column
    ensure_column(pool, "memories", "music_playlist", "TEXT DEFAULT '[]'").await?;

    Ok(())
}

/// Create the memories table
pub async fn create_memories_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memories (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            emotion TEXT DEFAULT 'peaceful',
            image TEXT,
            music_playlist TEXT DEFAULT '[]',
            memory_date DATETIME,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores JSON-encoded values under string keys.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Add `column` to `table` unless it already exists
///
/// `table`, `column` and `definition` are interpolated into SQL and must be
/// trusted constants.
pub async fn ensure_column(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<bool> {
    let columns = sqlx::query(&format!("PRAGMA table_info({})", table))
        .fetch_all(pool)
        .await?;

    let has_column = columns
        .iter()
        .any(|row| row.try_get::<String, _>("name").map(|n| n == column).unwrap_or(false));
    if has_column {
        return Ok(false);
    }

    sqlx::query(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition))
        .execute(pool)
        .await?;
    info!("Added column {}.{}", table, column);

    Ok(true)
}
