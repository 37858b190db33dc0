//! Audio session state
//!
//! Everything the controller knows about playlists and position, minus the
//! output itself. All playlists are kept as subsets of the library names.

use mnemo_common::playlist::{filter_existing, library_order, track_url};
use std::collections::HashSet;

use crate::backend::LibraryTrack;

/// Which playlist currently drives the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    Global,
    Memory,
}

/// Playlist of the memory being viewed
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPlayback {
    pub memory_id: String,
    pub playlist: Vec<String>,
    pub index: usize,
}

/// Where global playback was when a memory took over the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeState {
    pub index: usize,
    /// Seconds into the track
    pub time: f64,
    pub was_playing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSession {
    /// Sorted by [`library_order`], unique names
    pub library: Vec<LibraryTrack>,
    pub global_playlist: Vec<String>,
    pub global_track_index: usize,
    /// Playlist being edited for a memory
    pub memory_playlist_draft: Vec<String>,
    /// Present exactly while in memory mode
    pub current_memory_playback: Option<MemoryPlayback>,
    pub global_resume_state: Option<ResumeState>,
    pub target_volume: f64,
}

impl AudioSession {
    pub fn new(target_volume: f64) -> Self {
        Self {
            library: Vec::new(),
            global_playlist: Vec::new(),
            global_track_index: 0,
            memory_playlist_draft: Vec::new(),
            current_memory_playback: None,
            global_resume_state: None,
            target_volume,
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        if self.current_memory_playback.is_some() {
            PlaybackMode::Memory
        } else {
            PlaybackMode::Global
        }
    }

    /// Replace the library, dropping duplicate names and sorting
    pub fn set_library(&mut self, tracks: Vec<LibraryTrack>) {
        let mut seen = HashSet::new();
        let mut library: Vec<LibraryTrack> = tracks
            .into_iter()
            .filter(|track| seen.insert(track.name.clone()))
            .collect();
        library.sort_by(|a, b| library_order(&a.name, &b.name));
        self.library = library;
    }

    pub fn library_names(&self) -> Vec<String> {
        self.library.iter().map(|t| t.name.clone()).collect()
    }

    pub fn library_set(&self) -> HashSet<String> {
        self.library.iter().map(|t| t.name.clone()).collect()
    }

    /// Normalize `list` and keep only names present in the library
    pub fn filter_existing<S: AsRef<str>>(&self, list: &[S]) -> Vec<String> {
        filter_existing(list, &self.library_set())
    }

    /// URL of a library track, or the conventional music path when unknown
    pub fn track_url(&self, name: &str) -> String {
        self.library
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.url.clone())
            .unwrap_or_else(|| track_url(name))
    }

    /// Re-filter every playlist after the library changed
    ///
    /// Out-of-range indices fall back to 0. An emptied global playlist is
    /// left empty here; callers decide on a default.
    pub fn refilter(&mut self) {
        let library = self.library_set();

        self.global_playlist = filter_existing(&self.global_playlist, &library);
        if self.global_track_index >= self.global_playlist.len() {
            self.global_track_index = 0;
        }

        self.memory_playlist_draft = filter_existing(&self.memory_playlist_draft, &library);

        if let Some(current) = self.current_memory_playback.as_mut() {
            current.playlist = filter_existing(&current.playlist, &library);
            if current.index >= current.playlist.len() {
                current.index = 0;
            }
        }
    }

    /// Name of the track the active context points at
    pub fn active_track(&self) -> Option<&str> {
        match &self.current_memory_playback {
            Some(current) => current.playlist.get(current.index).map(String::as_str),
            None => self.global_playlist.get(self.global_track_index).map(String::as_str),
        }
    }
}

/// Wrap a possibly negative index into `0..len`; 0 for an empty list
pub fn wrap_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as i64) as usize
}
