//! Client runtime tunables

use mnemo_common::playlist::DEFAULT_VOLUME;
use std::time::Duration;

/// Audio controller settings
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Fade-in length when a global track starts with `fade_in`
    pub fade_in_ms: f64,
    /// Quiet period before a volume change is persisted
    pub volume_save_debounce: Duration,
    /// Volume used until settings are loaded
    pub default_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: 1500.0,
            volume_save_debounce: Duration::from_millis(400),
            default_volume: DEFAULT_VOLUME,
        }
    }
}
