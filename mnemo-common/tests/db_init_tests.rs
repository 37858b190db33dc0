//! Tests for database initialization
//!
//! Covers first-run creation, reopening an existing file, and the column
//! migration for databases that predate per-memory playlists.

use mnemo_common::db::init::{ensure_column, init_database, initialize_schema, open_in_memory};
use mnemo_common::db::models::MemoryRow;
use mnemo_common::Memory;
use sqlx::sqlite::SqlitePoolOptions;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("memories.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("memories.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO memories (id, title, content) VALUES ('a', 't', 'c')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM memories")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1, "Existing rows must survive re-initialization");
}

#[tokio::test]
async fn test_legacy_table_gains_playlist_column() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    // Schema as it looked before playlists existed
    sqlx::query(
        "CREATE TABLE memories (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            emotion TEXT DEFAULT 'peaceful',
            image TEXT,
            memory_date DATETIME,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO memories (id, title, content) VALUES ('old', 'Old', 'text')")
        .execute(&pool)
        .await
        .unwrap();

    initialize_schema(&pool).await.unwrap();

    let row: MemoryRow = sqlx::query_as("SELECT * FROM memories WHERE id = 'old'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.music_playlist.as_deref(), Some("[]"));

    let memory: Memory = row.into();
    assert!(memory.music_playlist.is_empty());
    assert_eq!(memory.emotion, "peaceful");
}

#[tokio::test]
async fn test_ensure_column_is_idempotent() {
    let pool = open_in_memory().await.unwrap();

    let added = ensure_column(&pool, "memories", "music_playlist", "TEXT DEFAULT '[]'")
        .await
        .unwrap();
    assert!(!added, "Column already present after schema init");

    let added = ensure_column(&pool, "settings", "note", "TEXT").await.unwrap();
    assert!(added);
    let added = ensure_column(&pool, "settings", "note", "TEXT").await.unwrap();
    assert!(!added);
}
