//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Volume used when no valid preference is stored
pub const DEFAULT_VOLUME: u8 = 50;

/// Transport status derived from the playback element
///
/// Owned by the engine and never shared for mutation. `current_time` is reset
/// on every current-track identity change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportStatus {
    /// Whether the element is currently playing
    pub is_playing: bool,

    /// Elapsed seconds (>= 0)
    pub current_time: f64,

    /// Track length in seconds (0 = unknown)
    pub duration: f64,

    /// Volume level (0-100)
    pub volume: u8,

    /// Loop the current track instead of advancing
    pub repeat_one: bool,
}

impl TransportStatus {
    /// Fresh status for a session starting at `volume`
    pub fn new(volume: u8) -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: volume.min(100),
            repeat_one: false,
        }
    }

    /// Duration suitable for a seek bar (0 unless finite and positive)
    pub fn safe_duration(&self) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration
        } else {
            0.0
        }
    }

    /// Elapsed time clamped to the seek bar range
    pub fn display_position(&self) -> f64 {
        self.current_time.min(self.safe_duration())
    }
}

impl Default for TransportStatus {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

/// Serializable view of the transport for UI layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSnapshot {
    /// Whether the element is currently playing
    pub is_playing: bool,

    /// Elapsed seconds, clamped to the duration
    pub position: f64,

    /// Safe duration in seconds
    pub duration: f64,

    /// `m:ss` label for the position
    pub position_label: String,

    /// `m:ss` label for the duration
    pub duration_label: String,

    /// Volume level (0-100)
    pub volume: u8,

    /// Whether volume is zero
    pub muted: bool,

    /// Repeat-one enabled
    pub repeat_one: bool,

    /// Player bar visible (a playable track is loaded)
    pub visible: bool,
}

/// Render seconds as `m:ss`
///
/// Non-finite and non-positive inputs render as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Configuration for a player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume when no valid preference is stored (0-100, default: 50)
    pub default_volume: u8,

    /// Catalog page size (default: 10)
    pub page_size: usize,

    /// JSON file for persisted preferences (default: none, volatile)
    pub preferences_path: Option<PathBuf>,

    /// Simulation tick interval in milliseconds (default: 250)
    pub tick_ms: u64,

    /// Simulated seconds of audio per real second (default: 1.0)
    pub playback_rate: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            page_size: groove_core::DEFAULT_PAGE_SIZE,
            preferences_path: None,
            tick_ms: 250,
            playback_rate: 1.0,
        }
    }
}

impl PlayerConfig {
    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.default_volume > 100 {
            return Err(crate::PlaybackError::InvalidOperation(format!(
                "default_volume must be 0-100, got {}",
                self.default_volume
            )));
        }
        if self.page_size == 0 {
            return Err(crate::PlaybackError::InvalidOperation(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(crate::PlaybackError::InvalidOperation(
                "tick_ms must be greater than zero".to_string(),
            ));
        }
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(crate::PlaybackError::InvalidOperation(format!(
                "playback_rate must be a positive number, got {}",
                self.playback_rate
            )));
        }
        Ok(())
    }

    /// Simulated seconds advanced per tick
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms as f64 / 1000.0 * self.playback_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.default_volume, 50);
        assert_eq!(config.page_size, 10);
        assert!(config.preferences_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_config() {
        let config = PlayerConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PlayerConfig {
            playback_rate: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PlayerConfig {
            default_volume: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn tick_seconds_scales_with_rate() {
        let config = PlayerConfig {
            tick_ms: 500,
            playback_rate: 4.0,
            ..Default::default()
        };
        assert!((config.tick_seconds() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(3725.4), "62:05");
    }

    #[test]
    fn display_position_is_clamped() {
        let mut status = TransportStatus::new(50);
        status.current_time = 12.0;
        assert_eq!(status.display_position(), 0.0);

        status.duration = 10.0;
        assert_eq!(status.display_position(), 10.0);

        status.duration = f64::NAN;
        assert_eq!(status.safe_duration(), 0.0);
    }
}
