//! Memory table queries

use mnemo_common::db::MemoryRow;
use sqlx::SqlitePool;

/// Column values for an insert or a full-row update
#[derive(Debug, Clone)]
pub struct MemoryValues {
    pub title: String,
    pub content: String,
    pub emotion: String,
    pub image: Option<String>,
    /// Already sanitized playlist
    pub music_playlist: Vec<String>,
    pub memory_date: Option<String>,
}

impl MemoryValues {
    fn playlist_json(&self) -> String {
        serde_json::to_string(&self.music_playlist).unwrap_or_else(|_| "[]".to_string())
    }
}

/// All memories, newest memory date first (creation time when undated)
pub async fn list_memories(db: &SqlitePool) -> sqlx::Result<Vec<MemoryRow>> {
    sqlx::query_as::<_, MemoryRow>(
        "SELECT * FROM memories ORDER BY COALESCE(memory_date, created_at) DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn get_memory(db: &SqlitePool, id: &str) -> sqlx::Result<Option<MemoryRow>> {
    sqlx::query_as::<_, MemoryRow>("SELECT * FROM memories WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_memory(db: &SqlitePool, id: &str, values: &MemoryValues) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO memories (id, title, content, emotion, image, music_playlist, memory_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(&values.title)
    .bind(&values.content)
    .bind(&values.emotion)
    .bind(&values.image)
    .bind(values.playlist_json())
    .bind(&values.memory_date)
    .execute(db)
    .await?;

    Ok(())
}

/// Overwrite every user-editable column and refresh `updated_at`
///
/// Returns false when no row has `id`.
pub async fn update_memory(db: &SqlitePool, id: &str, values: &MemoryValues) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE memories
        SET title = ?, content = ?, emotion = ?, image = ?, music_playlist = ?, memory_date = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&values.title)
    .bind(&values.content)
    .bind(&values.emotion)
    .bind(&values.image)
    .bind(values.playlist_json())
    .bind(&values.memory_date)
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when no row has `id`
pub async fn delete_memory(db: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM memories WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
