//! Memory viewer and editor
//!
//! Ties memory records to the audio controller: viewing a memory hands the
//! output to its playlist, closing the view gives it back, and the editor
//! works on the controller's playlist draft.

use mnemo_common::emotion::{first_option, label_for};
use mnemo_common::time::now_rfc3339;
use mnemo_common::Memory;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::audio::playlist::numbered_lines;
use crate::audio::AudioController;
use crate::backend::{ImageFile, MemoryBackend, MemoryDraft, MusicBackend};
use crate::error::Result;

/// Characters of content shown on a timeline card
pub const PREVIEW_CHARS: usize = 100;

const WAVE_OFFSETS: [i32; 4] = [70, 30, 50, 90];
const CONNECTOR_LENGTHS: [u32; 4] = [110, 80, 95, 120];

/// Music section of an opened memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioBlock {
    /// None of the memory's tracks are in the library
    NoDedicatedMusic,
    /// `"1. name"` lines
    Tracks(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryView {
    pub memory: Memory,
    pub emotion_label: String,
    pub audio: AudioBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit(String),
}

/// Editor contents; the playlist lives in the controller's draft
#[derive(Debug, Clone, PartialEq)]
pub struct EditorForm {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub emotion: String,
    /// Empty means "now" on save
    pub memory_date: Option<String>,
    /// Path of the stored image, if any
    pub current_image: Option<String>,
    /// Replacement image to upload
    pub new_image: Option<ImageFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineCard {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub side: Side,
    /// Horizontal wave offset in px, negative on the left
    pub offset_x: i32,
    pub connector_length: u32,
    pub preview: String,
    pub date: String,
}

/// First [`PREVIEW_CHARS`] characters, with `...` when cut
pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Cards for `memories` in the given order, alternating sides
pub fn timeline_layout(memories: &[Memory]) -> Vec<TimelineCard> {
    memories
        .iter()
        .enumerate()
        .map(|(index, memory)| {
            let side = if index % 2 == 0 { Side::Left } else { Side::Right };
            let wave = index % WAVE_OFFSETS.len();
            let offset_x = match side {
                Side::Left => -WAVE_OFFSETS[wave],
                Side::Right => WAVE_OFFSETS[wave],
            };
            TimelineCard {
                id: memory.id.clone(),
                title: memory.title.clone(),
                image: memory.image.clone(),
                side,
                offset_x,
                connector_length: CONNECTOR_LENGTHS[wave],
                preview: preview(&memory.content),
                date: memory.display_date().to_string(),
            }
        })
        .collect()
}

pub struct Journal<B> {
    audio: Arc<AudioController<B>>,
    view_generation: AtomicU64,
    /// Held from the staleness check until playback has switched, and while
    /// closing, so a close never lands between the two
    view_switch: Mutex<()>,
}

impl<B: MusicBackend + MemoryBackend> Journal<B> {
    pub fn new(audio: Arc<AudioController<B>>) -> Self {
        Self {
            audio,
            view_generation: AtomicU64::new(0),
            view_switch: Mutex::new(()),
        }
    }

    pub fn audio(&self) -> &Arc<AudioController<B>> {
        &self.audio
    }

    pub async fn list_memories(&self) -> Result<Vec<Memory>> {
        self.audio.backend().list_memories().await
    }

    pub async fn timeline(&self) -> Result<Vec<TimelineCard>> {
        Ok(timeline_layout(&self.list_memories().await?))
    }

    /// Open memory `id` and start its music
    ///
    /// Returns `None` when a newer `view_memory` or `close_view` call was
    /// made while this one was waiting on the server.
    pub async fn view_memory(&self, id: &str) -> Result<Option<MemoryView>> {
        let generation = self.view_generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.audio.ensure_loaded().await?;
        let memory = self.audio.backend().get_memory(id).await?;

        let _switch = self.view_switch.lock().await;
        if self.view_generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale view of memory {}", id);
            return Ok(None);
        }

        let playlist = self.audio.start_memory_playback(&memory).await;
        let audio = if playlist.is_empty() {
            AudioBlock::NoDedicatedMusic
        } else {
            AudioBlock::Tracks(numbered_lines(&playlist))
        };

        info!("Viewing memory {}", memory.id);
        Ok(Some(MemoryView {
            emotion_label: label_for(&memory.emotion).to_string(),
            memory,
            audio,
        }))
    }

    /// Close the memory view and give the output back to the global playlist
    pub async fn close_view(&self) -> bool {
        self.view_generation.fetch_add(1, Ordering::SeqCst);
        let _switch = self.view_switch.lock().await;
        self.audio.restore_global_playback().await
    }

    pub async fn open_editor(&self, mode: EditorMode) -> Result<EditorForm> {
        self.audio.ensure_loaded().await?;
        match mode {
            EditorMode::Add => {
                self.audio.set_memory_draft::<String>(&[]).await;
                Ok(EditorForm {
                    id: None,
                    title: String::new(),
                    content: String::new(),
                    emotion: first_option().value.to_string(),
                    memory_date: None,
                    current_image: None,
                    new_image: None,
                })
            }
            EditorMode::Edit(id) => {
                let memory = self.audio.backend().get_memory(&id).await?;
                self.audio.set_memory_draft(&memory.music_playlist).await;
                Ok(EditorForm {
                    id: Some(memory.id),
                    title: memory.title,
                    content: memory.content,
                    emotion: memory.emotion,
                    memory_date: memory.memory_date,
                    current_image: memory.image,
                    new_image: None,
                })
            }
        }
    }

    /// Create or update from `form` with the current playlist draft
    pub async fn save_memory(&self, form: &EditorForm) -> Result<Memory> {
        let draft = MemoryDraft {
            id: form.id.clone(),
            title: form.title.clone(),
            content: form.content.clone(),
            emotion: form.emotion.clone(),
            memory_date: form
                .memory_date
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(now_rfc3339),
            music_playlist: self.audio.memory_draft().await,
            image: form.new_image.clone(),
        };
        let saved = self.audio.backend().save_memory(&draft).await?;
        info!("Memory {} saved", saved.id);
        Ok(saved)
    }

    pub async fn delete_memory(&self, id: &str) -> Result<()> {
        self.audio.backend().delete_memory(id).await?;
        info!("Memory {} deleted", id);
        Ok(())
    }
}
