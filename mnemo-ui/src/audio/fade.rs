//! Frame-driven linear volume fade

/// A linear ramp from `from` to `to` over `duration_ms`
///
/// The ramp starts at the first frame timestamp it sees, so creating a fade
/// needs no clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f64,
    to: f64,
    duration_ms: f64,
    started_at: Option<f64>,
}

impl Fade {
    pub fn new(from: f64, to: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to: to.clamp(0.0, 1.0),
            duration_ms,
            started_at: None,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Volume at frame time `now` and whether the fade has finished
    pub fn sample(&mut self, now: f64) -> (f64, bool) {
        let start = *self.started_at.get_or_insert(now);
        let t = if self.duration_ms > 0.0 {
            ((now - start) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (self.from + (self.to - self.from) * t, t >= 1.0)
    }
}
