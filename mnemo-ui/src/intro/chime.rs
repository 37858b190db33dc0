//! Prompt chime synthesis
//!
//! A short triangle-wave ping: pitch falls exponentially from 880 Hz to
//! 440 Hz over 350 ms; gain rises linearly to 0.08 over 20 ms, then decays
//! exponentially to 0.001 at 400 ms; the tone stops at 450 ms.

const START_HZ: f64 = 880.0;
const END_HZ: f64 = 440.0;
const SWEEP_SECS: f64 = 0.35;
const ATTACK_SECS: f64 = 0.02;
const PEAK_GAIN: f64 = 0.08;
const DECAY_END_SECS: f64 = 0.4;
const FLOOR_GAIN: f64 = 0.001;
const STOP_SECS: f64 = 0.45;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeSynth {
    sample_rate: u32,
}

impl Default for ChimeSynth {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl ChimeSynth {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        STOP_SECS
    }

    /// Oscillator frequency `t` seconds in
    pub fn frequency_at(t: f64) -> f64 {
        if t >= SWEEP_SECS {
            END_HZ
        } else {
            START_HZ * (END_HZ / START_HZ).powf(t.max(0.0) / SWEEP_SECS)
        }
    }

    /// Envelope gain `t` seconds in
    pub fn gain_at(t: f64) -> f64 {
        if t <= 0.0 {
            0.0
        } else if t < ATTACK_SECS {
            PEAK_GAIN * t / ATTACK_SECS
        } else if t < DECAY_END_SECS {
            let x = (t - ATTACK_SECS) / (DECAY_END_SECS - ATTACK_SECS);
            PEAK_GAIN * (FLOOR_GAIN / PEAK_GAIN).powf(x)
        } else if t < STOP_SECS {
            FLOOR_GAIN
        } else {
            0.0
        }
    }

    /// Mono PCM samples in [-1, 1]
    pub fn render(&self) -> Vec<f32> {
        let rate = self.sample_rate as f64;
        let count = (STOP_SECS * rate).round() as usize;
        let mut phase = 0.0_f64;
        (0..count)
            .map(|n| {
                let t = n as f64 / rate;
                let value = triangle(phase) * Self::gain_at(t);
                phase = (phase + Self::frequency_at(t) / rate).fract();
                value as f32
            })
            .collect()
    }
}

/// Unit triangle wave at `phase` cycles; 0 at phase 0, peak at 0.25
fn triangle(phase: f64) -> f64 {
    1.0 - 4.0 * (((phase + 0.25).rem_euclid(1.0)) - 0.5).abs()
}
