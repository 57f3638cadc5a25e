/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] groove_core::GrooveError),

    #[error("Playback error: {0}")]
    Playback(#[from] groove_playback::PlaybackError),

    #[error("Track {0} is not in the selected play context")]
    UnknownTrack(i64),

    #[error("Nothing to play: the catalog query matched no tracks")]
    EmptyContext,
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
