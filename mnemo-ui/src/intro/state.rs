//! Intro progress flags

use super::timers::TimerId;

/// Progress of one intro run
///
/// Every flag goes false to true at most once between two `init` calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntroState {
    /// Frame time the run started at; set by `init` or the first frame
    pub start: Option<f64>,
    pub title_shown: bool,
    pub scene_ready: bool,
    pub cursor_enabled: bool,
    pub prompt_shown: bool,
    pub prompt_shaken: bool,
    pub interactive: bool,
    pub completed: bool,
    /// Repeating prompt shake while waiting for the click
    pub idle_shake_timer: Option<TimerId>,
}

impl IntroState {
    pub fn started_at(now: f64) -> Self {
        Self {
            start: Some(now),
            ..Self::default()
        }
    }

    /// Milliseconds since start, or 0 before the first frame
    pub fn elapsed(&self, now: f64) -> f64 {
        self.start.map(|start| now - start).unwrap_or(0.0)
    }
}

/// Last known pointer position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub inside: bool,
}
