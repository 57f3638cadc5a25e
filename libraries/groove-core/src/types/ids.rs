/// ID types for Groove entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// Backend rows use integer primary keys; identity in the queue is by this
/// value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(i64);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TrackId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_integer() {
        let id = TrackId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let parsed: TrackId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, TrackId::new(7));
    }

    #[test]
    fn parses_from_cli_text() {
        assert_eq!(" 12 ".parse::<TrackId>().unwrap(), TrackId::new(12));
        assert!("abc".parse::<TrackId>().is_err());
    }
}
