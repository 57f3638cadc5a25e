/// Core error types for Groove
use thiserror::Error;

/// Result type alias using `GrooveError`
pub type Result<T> = std::result::Result<T, GrooveError>;

/// Core error type for Groove
#[derive(Error, Debug)]
pub enum GrooveError {
    /// Catalog could not be loaded or parsed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Preference store read/write failure
    #[error("Preferences error: {0}")]
    Preferences(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl GrooveError {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a preferences error
    pub fn preferences(msg: impl Into<String>) -> Self {
        Self::Preferences(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
