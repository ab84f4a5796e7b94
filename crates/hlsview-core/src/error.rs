//! Error types for hlsview core

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, Error>;

/// Controller error types
///
/// Engine-originated failures never appear here: they are recorded in
/// [`PlayerState::error`](crate::PlayerState::error) and recovered from with
/// a reload. These variants are the failures reported synchronously at the
/// call boundary.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No source loaded")]
    NoSource,

    // Environment errors
    #[error("Fullscreen request rejected: {0}")]
    Fullscreen(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Returns the error code for log fields and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::NoSource => "NO_SOURCE",
            Error::Fullscreen(_) => "FULLSCREEN_REJECTED",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::ConfigParse(_) => "CONFIG_PARSE",
            Error::Io(_) => "IO",
        }
    }
}
