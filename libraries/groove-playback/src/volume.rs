//! Volume control with mute memory
//!
//! Volume range is 0-100%, mapped linearly to the element's 0.0-1.0 output
//! level. Muting sets the level to zero and remembers the last non-zero
//! level so unmuting can restore it.

use crate::types::DEFAULT_VOLUME;

/// Volume controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Last non-zero level, restored on unmute
    previous: Option<u8>,
}

impl Volume {
    /// Create new volume controller
    ///
    /// A non-zero starting level is also remembered for unmute.
    pub fn new(level: u8) -> Self {
        let level = level.min(100);
        Self {
            level,
            previous: (level > 0).then_some(level),
        }
    }

    /// Parse a stored preference value
    ///
    /// Missing or non-numeric values yield `fallback`; numbers are rounded
    /// and clamped to 0-100.
    pub fn from_preference(raw: Option<&str>, fallback: u8) -> Self {
        let level = raw
            .and_then(|value| value.trim().parse::<f64>().ok())
            .and_then(Self::normalize)
            .unwrap_or(fallback);
        Self::new(level)
    }

    /// Round and clamp a requested level
    ///
    /// Returns None for non-finite input.
    pub fn normalize(value: f64) -> Option<u8> {
        value
            .is_finite()
            .then(|| value.round().clamp(0.0, 100.0) as u8)
    }

    /// Set volume level (0-100)
    ///
    /// Only non-zero levels are remembered for unmute.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
        if self.level > 0 {
            self.previous = Some(self.level);
        }
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Last remembered non-zero level
    pub fn previous(&self) -> Option<u8> {
        self.previous
    }

    /// Check if muted (level is zero)
    pub fn is_muted(&self) -> bool {
        self.level == 0
    }

    /// Level to apply when mute is toggled
    ///
    /// At zero: the remembered level, or 50 when none was ever recorded.
    /// Otherwise: zero, after remembering the current level.
    pub fn toggle_mute_target(&mut self) -> u8 {
        if self.level == 0 {
            self.previous.unwrap_or(DEFAULT_VOLUME)
        } else {
            self.previous = Some(self.level);
            0
        }
    }

    /// Output level for the playback element (0.0-1.0)
    pub fn gain(&self) -> f64 {
        f64::from(self.level) / 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(80);
        assert_eq!(vol.level(), 80);
        assert_eq!(vol.previous(), Some(80));
        assert!(!vol.is_muted());

        let vol = Volume::new(0);
        assert!(vol.is_muted());
        assert_eq!(vol.previous(), None);
    }

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(50);
        vol.set_level(75);
        assert_eq!(vol.level(), 75);

        // Clamp to 100
        vol.set_level(150);
        assert_eq!(vol.level(), 100);

        // Zero keeps the last non-zero level
        vol.set_level(0);
        assert_eq!(vol.previous(), Some(100));
    }

    #[test]
    fn normalize_rounds_and_clamps() {
        assert_eq!(Volume::normalize(42.4), Some(42));
        assert_eq!(Volume::normalize(42.5), Some(43));
        assert_eq!(Volume::normalize(-7.0), Some(0));
        assert_eq!(Volume::normalize(250.0), Some(100));
        assert_eq!(Volume::normalize(f64::NAN), None);
        assert_eq!(Volume::normalize(f64::NEG_INFINITY), None);
    }

    #[test]
    fn preference_parsing() {
        assert_eq!(Volume::from_preference(None, 50).level(), 50);
        assert_eq!(Volume::from_preference(Some("loud"), 50).level(), 50);
        assert_eq!(Volume::from_preference(Some(" 35 "), 50).level(), 35);
        assert_eq!(Volume::from_preference(Some("140"), 50).level(), 100);
        assert_eq!(Volume::from_preference(Some("NaN"), 50).level(), 50);
    }

    #[test]
    fn toggle_mute_target() {
        let mut vol = Volume::new(64);
        assert_eq!(vol.toggle_mute_target(), 0);
        vol.set_level(0);
        assert_eq!(vol.toggle_mute_target(), 64);

        let mut silent = Volume::new(0);
        assert_eq!(silent.toggle_mute_target(), 50);
    }

    #[test]
    fn gain_is_linear() {
        assert_eq!(Volume::new(0).gain(), 0.0);
        assert!((Volume::new(50).gain() - 0.5).abs() < f64::EPSILON);
        assert!((Volume::new(100).gain() - 1.0).abs() < f64::EPSILON);
    }
}
