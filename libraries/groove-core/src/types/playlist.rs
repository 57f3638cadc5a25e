/// Playlist play-context types
use crate::types::Track;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A track as it appears inside a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// The track itself
    #[serde(alias = "song")]
    pub track: Track,

    /// Manual position (unset for entries never reordered)
    #[serde(default)]
    pub position: Option<i64>,

    /// When the track was added to the playlist
    pub added_at: DateTime<Utc>,
}

/// Build the queue for playing from a playlist
///
/// Entries are ordered by position ascending with unpositioned entries last,
/// then by `added_at` ascending.
pub fn playlist_queue(entries: &[PlaylistEntry]) -> Vec<Track> {
    let mut ordered: Vec<&PlaylistEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| {
        compare_positions(a.position, b.position).then_with(|| a.added_at.cmp(&b.added_at))
    });
    ordered.into_iter().map(|entry| entry.track.clone()).collect()
}

fn compare_positions(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: i64, position: Option<i64>, added_minute: u32) -> PlaylistEntry {
        PlaylistEntry {
            track: Track::new(id, format!("Track {id}"), "Artist"),
            position,
            added_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, added_minute, 0).unwrap(),
        }
    }

    #[test]
    fn orders_by_position_then_added_at() {
        let entries = vec![
            entry(1, None, 0),
            entry(2, Some(2), 1),
            entry(3, Some(1), 5),
            entry(4, Some(1), 2),
            entry(5, None, 3),
        ];

        let ids: Vec<i64> = playlist_queue(&entries).iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![4, 3, 2, 1, 5]);
    }

    #[test]
    fn empty_playlist_yields_empty_queue() {
        assert!(playlist_queue(&[]).is_empty());
    }
}
