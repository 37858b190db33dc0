//! Audio controller
//!
//! Drives one shared [`AudioOutput`] for two mutually exclusive contexts: the
//! persistent global playlist and the playlist of the memory being viewed.
//! Opening a memory snapshots global playback; closing it restores that
//! snapshot exactly once.
//!
//! Locking: the session lock is always released before the output lock is
//! taken, and neither is held across a backend request.

use mnemo_common::playlist::{clamp_volume, volume_from_value};
use mnemo_common::Memory;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use tokio::sync::{Mutex, OnceCell, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::fade::Fade;
use super::output::AudioOutput;
use super::playlist::{
    add_tracks, move_item, now_playing_lines, remove_tracks, remove_tracks_keep_current,
};
use super::session::{wrap_index, AudioSession, MemoryPlayback, PlaybackMode, ResumeState};
use crate::backend::{AudioSettings, AudioSettingsUpdate, MusicBackend};
use crate::config::AudioConfig;
use crate::error::Result;

/// How [`AudioController::play_track`] should start a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    /// Reload the source even if it is already loaded
    pub restart: bool,
    /// Seconds to seek to; values <= 0 mean the start (on reload)
    pub start_time: f64,
    /// Start silent and ramp to the target volume
    pub fade_in: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            restart: true,
            start_time: 0.0,
            fade_in: false,
        }
    }
}

impl PlayOptions {
    /// Continue the loaded source where it is
    pub fn resume() -> Self {
        Self {
            restart: false,
            ..Self::default()
        }
    }

    pub fn with_fade_in(mut self) -> Self {
        self.fade_in = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// The output refused; a retry waits for the next user gesture
    Parked,
    /// Nothing to play
    Skipped,
}

/// Work deferred until the user interacts
#[derive(Debug, Clone, PartialEq)]
enum PendingRetry {
    Track { name: String, options: PlayOptions },
    IntroAudio,
}

struct Player {
    output: Box<dyn AudioOutput>,
    fade: Option<Fade>,
}

impl Player {
    /// Point the output at `name`, reloading only when needed
    fn apply_source(&mut self, name: &str, url: &str, force_reload: bool, start_time: f64) {
        let same_track = self.output.current_track().as_deref() == Some(name);
        let reload = force_reload || !same_track;
        if reload {
            self.output.load(name, url);
        }
        if start_time > 0.0 {
            self.output.seek(start_time);
        } else if reload {
            self.output.seek(0.0);
        }
    }
}

fn lock_std<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct AudioController<B> {
    backend: Arc<B>,
    config: AudioConfig,
    session: RwLock<AudioSession>,
    player: Mutex<Player>,
    loaded: OnceCell<()>,
    pending_gesture: StdMutex<Option<PendingRetry>>,
    volume_save: StdMutex<Option<JoinHandle<()>>>,
}

impl<B: MusicBackend> AudioController<B> {
    pub fn new(backend: Arc<B>, output: Box<dyn AudioOutput>, config: AudioConfig) -> Self {
        let mut output = output;
        output.set_volume(config.default_volume);
        Self {
            backend,
            session: RwLock::new(AudioSession::new(config.default_volume)),
            config,
            player: Mutex::new(Player { output, fade: None }),
            loaded: OnceCell::new(),
            pending_gesture: StdMutex::new(None),
            volume_save: StdMutex::new(None),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load library and settings once
    ///
    /// Concurrent callers share a single load. A failed load is not
    /// remembered, so the next call tries again.
    pub async fn ensure_loaded(&self) -> Result<()> {
        self.loaded
            .get_or_try_init(|| self.load_library_and_settings())
            .await?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    async fn load_library_and_settings(&self) -> Result<()> {
        let (library, settings) =
            tokio::join!(self.backend.fetch_library(), self.backend.fetch_settings());
        let library = library?;
        let settings = settings.unwrap_or_else(|e| {
            warn!("Audio settings unavailable, using defaults: {}", e);
            AudioSettings::default()
        });

        let raw_playlist: Vec<String> = settings
            .global_playlist
            .as_ref()
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        let mut session = self.session.write().await;
        session.set_library(library);
        session.global_playlist = session.filter_existing(&raw_playlist);
        if session.global_playlist.is_empty() {
            session.global_playlist = session.library_names();
        }
        session.target_volume = settings
            .volume
            .as_ref()
            .map(|v| clamp_volume(volume_from_value(v)))
            .unwrap_or(self.config.default_volume);
        session.refilter();

        let volume = session.target_volume;
        info!(
            "Music library loaded: {} tracks, {} in global playlist, volume {:.2}",
            session.library.len(),
            session.global_playlist.len(),
            volume
        );
        drop(session);

        self.player.lock().await.output.set_volume(volume);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Start `name` on the output
    ///
    /// A refusal from the output is not an error: one retry is parked and run
    /// by the next [`Self::on_user_gesture`].
    pub async fn play_track(&self, name: &str, options: PlayOptions) -> PlayOutcome {
        if name.is_empty() {
            return PlayOutcome::Skipped;
        }
        let (url, target) = {
            let session = self.session.read().await;
            (session.track_url(name), session.target_volume)
        };
        let start_time = if options.start_time > 0.0 {
            options.start_time
        } else {
            0.0
        };

        let mut player = self.player.lock().await;
        player.apply_source(name, &url, options.restart, start_time);
        player.fade = None;
        player
            .output
            .set_volume(if options.fade_in { 0.0 } else { target });

        match player.output.play() {
            Ok(()) => {
                if options.fade_in {
                    let from = player.output.volume();
                    player.fade = Some(Fade::new(from, target, self.config.fade_in_ms));
                }
                debug!("Playing {} (restart={}, fade_in={})", name, options.restart, options.fade_in);
                PlayOutcome::Started
            }
            Err(rejected) => {
                drop(player);
                warn!("Playback of {} blocked ({}), waiting for user gesture", name, rejected);
                self.park(PendingRetry::Track {
                    name: name.to_string(),
                    options,
                });
                PlayOutcome::Parked
            }
        }
    }

    /// Play the global playlist at `index` (wrapped), leaving memory mode
    pub async fn play_global_track(&self, index: i64, options: PlayOptions) -> PlayOutcome {
        let name = {
            let mut session = self.session.write().await;
            if session.global_playlist.is_empty() {
                return PlayOutcome::Skipped;
            }
            let index = wrap_index(index, session.global_playlist.len());
            session.global_track_index = index;
            session.current_memory_playback = None;
            session.global_playlist[index].clone()
        };
        self.play_track(&name, options).await
    }

    /// Play the current memory playlist at `index` (wrapped); never fades in
    pub async fn play_memory_track(&self, index: i64, options: PlayOptions) -> PlayOutcome {
        let name = {
            let mut session = self.session.write().await;
            let Some(current) = session.current_memory_playback.as_mut() else {
                return PlayOutcome::Skipped;
            };
            if current.playlist.is_empty() {
                return PlayOutcome::Skipped;
            }
            current.index = wrap_index(index, current.playlist.len());
            current.playlist[current.index].clone()
        };
        let options = PlayOptions {
            fade_in: false,
            ..options
        };
        self.play_track(&name, options).await
    }

    /// Output reached the end of the current track
    pub async fn handle_audio_ended(&self) -> PlayOutcome {
        self.next_track().await
    }

    /// Advance the active context by one track
    pub async fn next_track(&self) -> PlayOutcome {
        enum Next {
            Memory(i64),
            Global(i64),
        }
        let next = {
            let session = self.session.read().await;
            match &session.current_memory_playback {
                Some(current) if !current.playlist.is_empty() => {
                    Some(Next::Memory(current.index as i64 + 1))
                }
                _ if !session.global_playlist.is_empty() => {
                    Some(Next::Global(session.global_track_index as i64 + 1))
                }
                _ => None,
            }
        };
        match next {
            Some(Next::Memory(index)) => self.play_memory_track(index, PlayOptions::default()).await,
            Some(Next::Global(index)) => self.play_global_track(index, PlayOptions::default()).await,
            None => PlayOutcome::Skipped,
        }
    }

    /// Resume the active context without reloading
    pub async fn play(&self) -> PlayOutcome {
        let (memory_index, global_index) = {
            let session = self.session.read().await;
            let memory_index = session
                .current_memory_playback
                .as_ref()
                .filter(|c| !c.playlist.is_empty())
                .map(|c| c.index);
            let global_index =
                (!session.global_playlist.is_empty()).then_some(session.global_track_index);
            (memory_index, global_index)
        };
        match (memory_index, global_index) {
            (Some(index), _) => self.play_memory_track(index as i64, PlayOptions::resume()).await,
            (None, Some(index)) => self.play_global_track(index as i64, PlayOptions::resume()).await,
            (None, None) => PlayOutcome::Skipped,
        }
    }

    pub async fn pause(&self) {
        let mut player = self.player.lock().await;
        if !player.output.is_paused() {
            player.output.pause();
        }
    }

    pub async fn toggle_play_pause(&self) {
        let paused = self.player.lock().await.output.is_paused();
        if paused {
            self.play().await;
        } else {
            self.pause().await;
        }
    }

    /// Load, leave memory mode and fade in the global track
    ///
    /// When loading fails the whole attempt is parked for the next gesture.
    pub async fn start_intro_audio(&self) -> PlayOutcome {
        if let Err(e) = self.ensure_loaded().await {
            warn!("Intro audio unavailable ({}), retrying on next gesture", e);
            self.park(PendingRetry::IntroAudio);
            return PlayOutcome::Parked;
        }
        let index = {
            let mut session = self.session.write().await;
            if session.global_playlist.is_empty() {
                return PlayOutcome::Skipped;
            }
            session.current_memory_playback = None;
            session.global_track_index
        };
        self.play_global_track(index as i64, PlayOptions::default().with_fade_in())
            .await
    }

    /// Run the parked retry, if any
    pub async fn on_user_gesture(&self) -> Option<PlayOutcome> {
        let retry = lock_std(&self.pending_gesture).take()?;
        debug!("User gesture, retrying {:?}", retry);
        let outcome = match retry {
            PendingRetry::Track { name, options } => self.play_track(&name, options).await,
            PendingRetry::IntroAudio => self.start_intro_audio().await,
        };
        Some(outcome)
    }

    pub fn has_pending_gesture(&self) -> bool {
        lock_std(&self.pending_gesture).is_some()
    }

    fn park(&self, retry: PendingRetry) {
        *lock_std(&self.pending_gesture) = Some(retry);
    }

    // ------------------------------------------------------------------
    // Memory context
    // ------------------------------------------------------------------

    /// Switch to `memory`'s playlist, remembering global playback
    ///
    /// Returns the playlist now playing. It is empty, and the controller stays
    /// in global mode, when none of the memory's tracks are in the library.
    pub async fn start_memory_playback(&self, memory: &Memory) -> Vec<String> {
        let playlist = self
            .session
            .read()
            .await
            .filter_existing(&memory.music_playlist);

        if playlist.is_empty() {
            self.session.write().await.current_memory_playback = None;
            debug!("Memory {} has no playable music", memory.id);
            return playlist;
        }

        let (time, was_playing) = {
            let player = self.player.lock().await;
            let position = player.output.position();
            (
                if position.is_finite() { position } else { 0.0 },
                !player.output.is_paused(),
            )
        };

        {
            let mut session = self.session.write().await;
            // Moving between memories keeps the original global snapshot
            if session.mode() == PlaybackMode::Global || session.global_resume_state.is_none() {
                session.global_resume_state = Some(ResumeState {
                    index: session.global_track_index,
                    time,
                    was_playing,
                });
            }
            session.current_memory_playback = Some(MemoryPlayback {
                memory_id: memory.id.clone(),
                playlist: playlist.clone(),
                index: 0,
            });
        }

        info!("Memory playback started for {}", memory.id);
        self.play_memory_track(0, PlayOptions::default()).await;
        playlist
    }

    /// Leave memory mode and put global playback back where it was
    ///
    /// The resume snapshot is consumed; a second call is a no-op. Returns
    /// whether anything changed.
    pub async fn restore_global_playback(&self) -> bool {
        let (resume, index, name, url, target) = {
            let mut session = self.session.write().await;
            if session.mode() != PlaybackMode::Memory && session.global_resume_state.is_none() {
                return false;
            }
            let resume = session.global_resume_state.take();
            session.current_memory_playback = None;

            let Some(resume) = resume else {
                return true;
            };
            if session.global_playlist.is_empty() {
                return true;
            }
            let index = wrap_index(resume.index as i64, session.global_playlist.len());
            session.global_track_index = index;
            let name = session.global_playlist[index].clone();
            let url = session.track_url(&name);
            (resume, index, name, url, session.target_volume)
        };

        let time = if resume.time.is_finite() {
            resume.time.max(0.0)
        } else {
            0.0
        };

        if resume.was_playing {
            let options = PlayOptions {
                restart: time <= 0.0,
                start_time: time,
                fade_in: false,
            };
            self.play_global_track(index as i64, options).await;
        } else {
            let mut player = self.player.lock().await;
            player.apply_source(&name, &url, true, time);
            player.output.pause();
            player.fade = None;
            player.output.set_volume(target);
        }
        info!("Global playback restored at track {} ({:.1}s)", index, time);
        true
    }

    /// `"> 1. name"` lines for the memory audio block; empty outside memory mode
    pub async fn now_playing(&self) -> Vec<String> {
        let session = self.session.read().await;
        match &session.current_memory_playback {
            Some(current) => now_playing_lines(&current.playlist, current.index),
            None => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Volume and fades
    // ------------------------------------------------------------------

    /// Start a linear fade of the output volume
    pub async fn fade_audio_to(&self, target: f64, duration_ms: f64) {
        let mut player = self.player.lock().await;
        let from = player.output.volume();
        player.fade = Some(Fade::new(from, target, duration_ms));
    }

    /// Advance the active fade to frame time `now` (milliseconds)
    pub async fn on_frame(&self, now: f64) {
        let mut guard = self.player.lock().await;
        let player = &mut *guard;
        let Some(fade) = player.fade.as_mut() else {
            return;
        };
        let (volume, done) = fade.sample(now);
        player.output.set_volume(volume);
        if done {
            player.fade = None;
        }
    }

    pub async fn is_fading(&self) -> bool {
        self.player.lock().await.fade.is_some()
    }

    /// Set the target volume immediately and persist it after a quiet period
    ///
    /// Must be called from within a tokio runtime.
    pub async fn set_volume(&self, volume: f64) {
        let volume = clamp_volume(volume);
        self.session.write().await.target_volume = volume;
        {
            let mut player = self.player.lock().await;
            player.fade = None;
            player.output.set_volume(volume);
        }
        self.schedule_volume_save(volume);
    }

    fn schedule_volume_save(&self, volume: f64) {
        let backend = Arc::clone(&self.backend);
        let delay = self.config.volume_save_debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let update = AudioSettingsUpdate {
                volume: Some(volume),
                ..Default::default()
            };
            match backend.save_settings(update).await {
                Ok(_) => debug!("Volume {:.2} saved", volume),
                Err(e) => error!("Failed to save volume: {}", e),
            }
        });
        if let Some(previous) = lock_std(&self.volume_save).replace(handle) {
            previous.abort();
        }
    }

    // ------------------------------------------------------------------
    // Playlist editing
    // ------------------------------------------------------------------

    pub async fn add_to_global_playlist(&self, selected: &[String]) {
        let mut session = self.session.write().await;
        let library = session.library_set();
        add_tracks(&mut session.global_playlist, selected, &library);
    }

    /// Remove tracks, keeping the index on the current track when it survives
    pub async fn remove_from_global_playlist(&self, selected: &HashSet<String>) {
        let mut session = self.session.write().await;
        let current = session.global_track_index;
        session.global_track_index =
            remove_tracks_keep_current(&mut session.global_playlist, current, selected);
    }

    pub async fn move_global_track_up(&self, index: usize) -> usize {
        move_item(&mut self.session.write().await.global_playlist, index, -1)
    }

    pub async fn move_global_track_down(&self, index: usize) -> usize {
        move_item(&mut self.session.write().await.global_playlist, index, 1)
    }

    /// Persist the global playlist, then pause or resume to match it
    ///
    /// On failure the session is left as it was and the error is returned.
    pub async fn save_global_playlist(&self) -> Result<()> {
        self.ensure_loaded().await?;

        let (playlist, index) = {
            let session = self.session.read().await;
            let playlist = session.filter_existing(&session.global_playlist);
            let index = if session.global_track_index >= playlist.len() {
                0
            } else {
                session.global_track_index
            };
            (playlist, index)
        };

        self.backend
            .save_settings(AudioSettingsUpdate {
                global_playlist: Some(playlist.clone()),
                volume: None,
            })
            .await?;

        let mode = {
            let mut session = self.session.write().await;
            session.global_playlist = playlist.clone();
            session.global_track_index = index;
            session.mode()
        };
        info!("Global playlist saved ({} tracks)", playlist.len());

        if playlist.is_empty() {
            if mode == PlaybackMode::Global {
                self.pause().await;
            }
            return Ok(());
        }

        let paused = self.player.lock().await.output.is_paused();
        if paused {
            self.play_global_track(index as i64, PlayOptions::resume().with_fade_in())
                .await;
        }
        Ok(())
    }

    pub async fn add_to_memory_draft(&self, selected: &[String]) {
        let mut session = self.session.write().await;
        let library = session.library_set();
        add_tracks(&mut session.memory_playlist_draft, selected, &library);
    }

    pub async fn remove_from_memory_draft(&self, selected: &HashSet<String>) {
        remove_tracks(&mut self.session.write().await.memory_playlist_draft, selected);
    }

    pub async fn move_memory_track_up(&self, index: usize) -> usize {
        move_item(&mut self.session.write().await.memory_playlist_draft, index, -1)
    }

    pub async fn move_memory_track_down(&self, index: usize) -> usize {
        move_item(&mut self.session.write().await.memory_playlist_draft, index, 1)
    }

    /// Replace the draft with the library-filtered `playlist`
    pub async fn set_memory_draft<S: AsRef<str>>(&self, playlist: &[S]) {
        let mut session = self.session.write().await;
        session.memory_playlist_draft = session.filter_existing(playlist);
    }

    pub async fn memory_draft(&self) -> Vec<String> {
        self.session.read().await.memory_playlist_draft.clone()
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Copy of the current session state
    pub async fn session(&self) -> AudioSession {
        self.session.read().await.clone()
    }

    pub async fn is_paused(&self) -> bool {
        self.player.lock().await.output.is_paused()
    }

    pub async fn current_track(&self) -> Option<String> {
        self.player.lock().await.output.current_track()
    }

    pub async fn output_volume(&self) -> f64 {
        self.player.lock().await.output.volume()
    }

    pub async fn output_position(&self) -> f64 {
        self.player.lock().await.output.position()
    }
}
