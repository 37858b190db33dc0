//! Test helpers: an in-process fake of mnemo-server and fixture builders

#![allow(dead_code)]

use mnemo_common::Memory;
use mnemo_ui::audio::{AudioController, SimulatedOutput};
use mnemo_ui::backend::{
    AudioSettings, AudioSettingsUpdate, LibraryTrack, MemoryBackend, MemoryDraft, MusicBackend,
};
use mnemo_ui::{AudioConfig, Result, UiError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FakeState {
    pub library: Vec<LibraryTrack>,
    pub settings: AudioSettings,
    pub memories: Vec<Memory>,
    pub fail_library: bool,
    pub fail_settings: bool,
    pub fail_save: bool,
    pub library_fetches: usize,
    pub saves: Vec<AudioSettingsUpdate>,
    pub saved_drafts: Vec<MemoryDraft>,
    /// Artificial latency of `get_memory` per id
    pub memory_delays: HashMap<String, Duration>,
}

/// Fake server holding everything in memory
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

fn unavailable(path: &str) -> UiError {
    UiError::Status {
        url: path.to_string(),
        status: 503,
        message: Some("unavailable".to_string()),
    }
}

impl FakeBackend {
    pub fn new(library_names: &[&str], global_playlist: Value, volume: Value) -> Arc<Self> {
        let backend = Self::default();
        {
            let mut state = backend.state();
            state.library = library(library_names);
            state.settings = AudioSettings {
                global_playlist: Some(global_playlist),
                volume: Some(volume),
            };
        }
        Arc::new(backend)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn add_memory(&self, memory: Memory) {
        self.state().memories.push(memory);
    }
}

impl MusicBackend for FakeBackend {
    async fn fetch_library(&self) -> Result<Vec<LibraryTrack>> {
        let mut state = self.state();
        state.library_fetches += 1;
        if state.fail_library {
            return Err(unavailable("/api/music/files"));
        }
        Ok(state.library.clone())
    }

    async fn fetch_settings(&self) -> Result<AudioSettings> {
        let state = self.state();
        if state.fail_settings {
            return Err(unavailable("/api/audio/settings"));
        }
        Ok(state.settings.clone())
    }

    async fn save_settings(&self, update: AudioSettingsUpdate) -> Result<AudioSettings> {
        let mut state = self.state();
        if state.fail_save {
            return Err(unavailable("/api/audio/settings"));
        }
        if let Some(playlist) = &update.global_playlist {
            state.settings.global_playlist = Some(json!(playlist));
        }
        if let Some(volume) = update.volume {
            state.settings.volume = Some(json!(volume));
        }
        state.saves.push(update);
        Ok(state.settings.clone())
    }
}

impl MemoryBackend for FakeBackend {
    async fn list_memories(&self) -> Result<Vec<Memory>> {
        Ok(self.state().memories.clone())
    }

    async fn get_memory(&self, id: &str) -> Result<Memory> {
        let delay = self.state().memory_delays.get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.state()
            .memories
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| UiError::Status {
                url: format!("/api/memories/{}", id),
                status: 404,
                message: Some("Memory not found".to_string()),
            })
    }

    async fn save_memory(&self, draft: &MemoryDraft) -> Result<Memory> {
        let mut state = self.state();
        state.saved_drafts.push(draft.clone());
        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| format!("mem-{}", state.memories.len() + 1));
        let saved = Memory {
            id: id.clone(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            emotion: draft.emotion.clone(),
            image: None,
            music_playlist: draft.music_playlist.clone(),
            memory_date: Some(draft.memory_date.clone()),
            created_at: "2024-05-01 10:00:00".to_string(),
            updated_at: "2024-05-01 10:00:00".to_string(),
        };
        state.memories.retain(|m| m.id != id);
        state.memories.push(saved.clone());
        Ok(saved)
    }

    async fn delete_memory(&self, id: &str) -> Result<()> {
        let mut state = self.state();
        let before = state.memories.len();
        state.memories.retain(|m| m.id != id);
        if state.memories.len() == before {
            return Err(UiError::Status {
                url: format!("/api/memories/{}", id),
                status: 404,
                message: Some("Memory not found".to_string()),
            });
        }
        Ok(())
    }
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn library(items: &[&str]) -> Vec<LibraryTrack> {
    items
        .iter()
        .map(|name| LibraryTrack {
            name: name.to_string(),
            url: format!("/music/{}", name),
        })
        .collect()
}

pub fn memory(id: &str, playlist: &[&str]) -> Memory {
    Memory {
        id: id.to_string(),
        title: format!("Memory {}", id),
        content: "A quiet morning by the sea.".to_string(),
        emotion: "nostalgic".to_string(),
        image: None,
        music_playlist: names(playlist),
        memory_date: Some("2023-08-14T07:30:00.000Z".to_string()),
        created_at: "2023-08-15 09:00:00".to_string(),
        updated_at: "2023-08-15 09:00:00".to_string(),
    }
}

/// Controller over `backend` plus a handle to its simulated output
pub fn controller(
    backend: Arc<FakeBackend>,
) -> (Arc<AudioController<FakeBackend>>, SimulatedOutput) {
    let output = SimulatedOutput::new();
    let audio = AudioController::new(backend, Box::new(output.clone()), AudioConfig::default());
    (Arc::new(audio), output)
}

/// Library a/b/c, global playlist [a, b, c], volume 0.6
pub fn standard_backend() -> Arc<FakeBackend> {
    FakeBackend::new(
        &["a.mp3", "b.mp3", "c.mp3"],
        json!(["a.mp3", "b.mp3", "c.mp3"]),
        json!(0.6),
    )
}
