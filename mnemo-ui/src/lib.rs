//! mnemo-ui library - client core of the memory journal
//!
//! - [`intro`]: frame-driven intro sequencer and its procedural scene
//! - [`audio`]: background/memory music controller
//! - [`backend`]: HTTP client for mnemo-server
//! - [`journal`]: memory viewer and editor glue

pub mod audio;
pub mod backend;
pub mod config;
pub mod error;
pub mod intro;
pub mod journal;

pub use config::AudioConfig;
pub use error::{Result, UiError};
