//! Error types for mnemo-ui

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UiError>;

#[derive(Debug, Error)]
pub enum UiError {
    /// Transport failure talking to the server
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} -> {status}{}", suffix(.message))]
    Status {
        url: String,
        status: u16,
        message: Option<String>,
    },

    /// Response body was not the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default()
}

impl UiError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            UiError::Status { status, .. } => Some(*status),
            UiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
