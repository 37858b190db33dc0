//! Intro sequence
//!
//! [`IntroSequencer`] is synchronous and driven by frame timestamps in
//! milliseconds. It draws through a [`Renderer`] and reports presentation
//! changes to an [`IntroView`]; it holds no audio state and only asks the
//! view for a chime.

mod chime;
pub mod render;
pub mod scene;
mod sequencer;
mod sigil;
mod state;
mod timers;
mod timing;
mod view;

pub use chime::{ChimeSynth, DEFAULT_SAMPLE_RATE};
pub use render::{Composite, DisplayList, DrawCommand, Paint, Renderer, Rgba};
pub use sequencer::{IntroSequencer, IntroTask};
pub use sigil::draw_sigil;
pub use state::{IntroState, Pointer};
pub use timers::{TimerId, TimerQueue};
pub use timing::{clamp, ease_in_out, IntroTiming};
pub use view::{IntroView, RecordingView, ViewEffect};
