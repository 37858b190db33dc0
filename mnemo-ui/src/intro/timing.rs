//! Intro timeline constants and easing

/// Milestones and delays of the intro, in milliseconds
///
/// Thresholds are measured from the sequencer's start; delays are relative
/// to the event that schedules them.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroTiming {
    pub title: f64,
    pub title_fade: f64,
    pub scene_start: f64,
    pub scene_ready: f64,
    pub prompt: f64,
    pub prompt_shake: f64,
    pub interactive: f64,
    /// Scene progress goes 0 to 1 over this span after `scene_start`
    pub scene_fade_in: f64,
    pub title_glow_delay: f64,
    pub shake_duration: f64,
    pub idle_shake_interval: f64,
    pub dialog_show_delay: f64,
    pub title_glow_off_delay: f64,
    pub overlay_fade_out: f64,
    pub overlay_remove: f64,
    pub trail_life: f64,
    pub footprint_life: f64,
    pub trail_throttle: f64,
    pub footprint_throttle: f64,
}

impl Default for IntroTiming {
    fn default() -> Self {
        Self {
            title: 1000.0,
            title_fade: 11000.0,
            scene_start: 1500.0,
            scene_ready: 3000.0,
            prompt: 3500.0,
            prompt_shake: 4000.0,
            interactive: 4500.0,
            scene_fade_in: 1500.0,
            title_glow_delay: 40.0,
            shake_duration: 500.0,
            idle_shake_interval: 3000.0,
            dialog_show_delay: 40.0,
            title_glow_off_delay: 300.0,
            overlay_fade_out: 5200.0,
            overlay_remove: 7000.0,
            trail_life: 500.0,
            footprint_life: 3000.0,
            trail_throttle: 30.0,
            footprint_throttle: 120.0,
        }
    }
}

impl IntroTiming {
    /// Scene fade-in progress in [0, 1]
    pub fn scene_progress(&self, elapsed: f64) -> f64 {
        clamp((elapsed - self.scene_start) / self.scene_fade_in, 0.0, 1.0)
    }

    /// `(expand, collapse)` of the intro particles: expand over the first
    /// `title` ms, collapse from `title` to `title_fade`
    pub fn intro_particle_phase(&self, elapsed: f64) -> (f64, f64) {
        let expand = clamp(elapsed / self.title, 0.0, 1.0);
        let collapse = clamp(
            (elapsed - self.title) / (self.title_fade - self.title),
            0.0,
            1.0,
        );
        (expand, collapse)
    }
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Quadratic ease-in-out
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}
