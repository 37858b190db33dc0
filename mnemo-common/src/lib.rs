//! # Mnemo Common Library
//!
//! Shared code for the Mnemo memory journal:
//! - Error type and result alias
//! - Root folder resolution and on-disk layout
//! - Database initialization and models
//! - The memory record exchanged over HTTP
//! - Playlist parsing and normalization
//! - Emotion tag catalog

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod emotion;
pub mod error;
pub mod memory;
pub mod playlist;
pub mod time;

pub use error::{Error, Result};
pub use memory::Memory;
