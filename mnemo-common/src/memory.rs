//! Memory record as exchanged over the HTTP API

use serde::{Deserialize, Serialize};

/// A journal entry
///
/// Timestamps are kept as the strings SQLite stores: `created_at` and
/// `updated_at` use `YYYY-MM-DD HH:MM:SS`, `memory_date` is whatever the
/// author supplied (RFC 3339 when defaulted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub title: String,
    pub content: String,
    pub emotion: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub music_playlist: Vec<String>,
    #[serde(default)]
    pub memory_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Memory {
    /// Date shown on the timeline: the memory date, else the creation time
    pub fn display_date(&self) -> &str {
        self.memory_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_optional_fields() {
        let memory: Memory = serde_json::from_str(
            r#"{"id":"1","title":"t","content":"c","emotion":"warm",
                "created_at":"2024-01-01 00:00:00","updated_at":"2024-01-01 00:00:00"}"#,
        )
        .unwrap();
        assert!(memory.music_playlist.is_empty());
        assert!(memory.image.is_none());
        assert_eq!(memory.display_date(), "2024-01-01 00:00:00");
    }

    #[test]
    fn test_display_date_prefers_memory_date() {
        let memory = Memory {
            id: "1".into(),
            title: "t".into(),
            content: "c".into(),
            emotion: "warm".into(),
            image: None,
            music_playlist: vec![],
            memory_date: Some("2019-05-04T10:00:00.000Z".into()),
            created_at: "2024-01-01 00:00:00".into(),
            updated_at: "2024-01-01 00:00:00".into(),
        };
        assert_eq!(memory.display_date(), "2019-05-04T10:00:00.000Z");
    }
}
