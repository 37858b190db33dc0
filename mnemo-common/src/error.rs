//! Error type shared by the Mnemo server and client

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or invalid `mnemo.toml`
    #[error("Configuration error: {0}")]
    Config(String),

    /// The music folder could not be created or listed
    #[error("Music library unavailable at {}: {source}", path.display())]
    Library {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An uploaded image could not be written to the uploads folder
    #[error("Failed to store upload '{name}': {source}")]
    Upload {
        name: String,
        source: std::io::Error,
    },

    /// No memory with this id; the message is what clients display
    #[error("Memory not found")]
    MemoryNotFound { id: String },

    /// A submitted memory is missing required fields
    #[error("{0}")]
    InvalidMemory(String),
}

impl Error {
    pub fn memory_not_found(id: impl Into<String>) -> Self {
        Error::MemoryNotFound { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_messages() {
        assert_eq!(Error::memory_not_found("m1").to_string(), "Memory not found");

        let err = Error::Library {
            path: PathBuf::from("/srv/mnemo/public/music"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "Music library unavailable at /srv/mnemo/public/music: denied"
        );
        assert!(err.source().is_some());
    }
}
