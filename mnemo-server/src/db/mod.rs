//! Database access layer for mnemo-server

pub mod memories;
pub mod settings;
