//! Background and memory music
//!
//! [`AudioController`] owns the session and a single [`AudioOutput`]. The
//! rest of this module is plain state and list helpers it builds on.

mod controller;
mod fade;
mod output;
pub mod playlist;
mod session;

pub use controller::{AudioController, PlayOptions, PlayOutcome};
pub use fade::Fade;
pub use output::{AudioOutput, PlaybackRejected, SimulatedOutput};
pub use session::{wrap_index, AudioSession, MemoryPlayback, PlaybackMode, ResumeState};
