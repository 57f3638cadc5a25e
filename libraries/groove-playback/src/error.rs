//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// None of these ever escape element event handling; the engine logs them
/// and degrades to "not playing".
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Playback element refused an operation (listener registration, load)
    #[error("Playback element error: {0}")]
    Element(String),

    /// Volume preference could not be read or written
    #[error("Preferences error: {0}")]
    Preferences(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Core error (catalog, preference store)
    #[error(transparent)]
    Core(#[from] groove_core::GrooveError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
