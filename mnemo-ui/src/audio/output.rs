//! Audio output abstraction
//!
//! [`AudioOutput`] models a single media element: one loaded source, a play
//! position, a volume and a paused flag. `play` can be refused by the host
//! (autoplay policy), which the controller treats as recoverable.

use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

/// The host refused to start playback until the user interacts
#[derive(Debug, Clone, Error, PartialEq)]
#[error("playback rejected: {0}")]
pub struct PlaybackRejected(pub String);

pub trait AudioOutput: Send {
    /// Name of the loaded track, if any
    fn current_track(&self) -> Option<String>;

    /// Replace the source and start loading it; position returns to 0
    fn load(&mut self, track: &str, url: &str);

    /// Seek to `seconds`; applied once metadata is available
    fn seek(&mut self, seconds: f64);

    /// Play position in seconds
    fn position(&self) -> f64;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn play(&mut self) -> Result<(), PlaybackRejected>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
struct SimState {
    track: Option<String>,
    url: Option<String>,
    position: f64,
    pending_seek: Option<f64>,
    metadata_ready: bool,
    volume: f64,
    paused: bool,
    block_autoplay: bool,
    defer_metadata: bool,
    loads: usize,
}

/// In-memory output for headless hosts and tests
///
/// Cloning yields another handle to the same simulated element, so a test can
/// keep one handle while the controller owns the other.
#[derive(Debug, Clone)]
pub struct SimulatedOutput {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimulatedOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedOutput {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                track: None,
                url: None,
                position: 0.0,
                pending_seek: None,
                metadata_ready: false,
                volume: 1.0,
                paused: true,
                block_autoplay: false,
                defer_metadata: false,
                loads: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        // A poisoned lock only means a test panicked mid-update
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Refuse `play` calls until cleared
    pub fn set_block_autoplay(&self, blocked: bool) {
        self.lock().block_autoplay = blocked;
    }

    /// Keep metadata unavailable after `load` until [`Self::finish_loading`]
    pub fn set_defer_metadata(&self, deferred: bool) {
        self.lock().defer_metadata = deferred;
    }

    /// Metadata arrives; a pending seek is applied
    pub fn finish_loading(&self) {
        let mut state = self.lock();
        state.metadata_ready = true;
        if let Some(seconds) = state.pending_seek.take() {
            state.position = seconds;
        }
    }

    /// Advance the play position while playing
    pub fn advance(&self, seconds: f64) {
        let mut state = self.lock();
        if !state.paused && state.metadata_ready {
            state.position += seconds;
        }
    }

    pub fn url(&self) -> Option<String> {
        self.lock().url.clone()
    }

    /// Number of `load` calls so far
    pub fn load_count(&self) -> usize {
        self.lock().loads
    }
}

impl AudioOutput for SimulatedOutput {
    fn current_track(&self) -> Option<String> {
        self.lock().track.clone()
    }

    fn load(&mut self, track: &str, url: &str) {
        let mut state = self.lock();
        state.track = Some(track.to_string());
        state.url = Some(url.to_string());
        state.position = 0.0;
        state.pending_seek = None;
        state.metadata_ready = !state.defer_metadata;
        state.loads += 1;
        debug!("Simulated output loaded {}", url);
    }

    fn seek(&mut self, seconds: f64) {
        let mut state = self.lock();
        if state.metadata_ready {
            state.position = seconds;
        } else {
            state.pending_seek = Some(seconds);
        }
    }

    fn position(&self) -> f64 {
        self.lock().position
    }

    fn volume(&self) -> f64 {
        self.lock().volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.lock().volume = volume.clamp(0.0, 1.0);
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        let mut state = self.lock();
        if state.block_autoplay {
            return Err(PlaybackRejected("autoplay blocked".to_string()));
        }
        if state.track.is_none() {
            return Err(PlaybackRejected("no source".to_string()));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.lock().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.lock().paused
    }
}
