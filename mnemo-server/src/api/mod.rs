//! HTTP API handlers for mnemo-server

pub mod audio_settings;
pub mod health;
pub mod memories;
pub mod music;

pub use audio_settings::audio_settings_routes;
pub use health::health_routes;
pub use memories::memory_routes;
pub use music::music_routes;
