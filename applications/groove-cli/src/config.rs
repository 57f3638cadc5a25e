/// CLI configuration
use crate::error::{CliError, Result};
use groove_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "groove.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GrooveConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// JSON file of track rows, used when `--catalog` is not given
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl GrooveConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `groove.toml` is read if
    /// present. Environment variables override both, e.g.
    /// `GROOVE_PLAYER__DEFAULT_VOLUME=30`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with GROOVE_)
        settings = settings.add_source(
            config::Environment::with_prefix("GROOVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.player
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = GrooveConfig::from_toml("").unwrap();
        assert_eq!(config, GrooveConfig::default());
        assert_eq!(config.player.default_volume, 50);
    }

    #[test]
    fn reads_player_and_catalog_sections() {
        let config = GrooveConfig::from_toml(
            r#"
            [player]
            default_volume = 35
            tick_ms = 100
            preferences_path = "state/prefs.json"

            [catalog]
            path = "songs.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.player.default_volume, 35);
        assert_eq!(config.player.tick_ms, 100);
        assert_eq!(config.player.page_size, 10);
        assert_eq!(
            config.player.preferences_path,
            Some(PathBuf::from("state/prefs.json"))
        );
        assert_eq!(config.catalog.path, Some(PathBuf::from("songs.json")));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = GrooveConfig::from_toml("[player]\npage_size = 0\n").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[player]\nplayback_rate = 8.0\n").unwrap();

        let config = GrooveConfig::load(Some(&path)).unwrap();
        assert_eq!(config.player.playback_rate, 8.0);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(GrooveConfig::load(Some(&path)).is_err());
    }
}
