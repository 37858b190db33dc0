//! Database models

use crate::memory::Memory;
use crate::playlist::parse_playlist_text;

/// Raw `memories` row; `music_playlist` is JSON text
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemoryRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub emotion: Option<String>,
    pub image: Option<String>,
    pub music_playlist: Option<String>,
    pub memory_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MemoryRow {
    /// Stored playlist, parsed leniently (malformed text reads as empty)
    pub fn playlist(&self) -> Vec<String> {
        parse_playlist_text(self.music_playlist.as_deref().unwrap_or(""), &[])
    }
}

impl From<MemoryRow> for Memory {
    fn from(row: MemoryRow) -> Self {
        let music_playlist = row.playlist();
        Memory {
            id: row.id,
            title: row.title,
            content: row.content,
            emotion: row
                .emotion
                .unwrap_or_else(|| crate::emotion::DEFAULT_EMOTION.to_string()),
            image: row.image,
            music_playlist,
            memory_date: row.memory_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
