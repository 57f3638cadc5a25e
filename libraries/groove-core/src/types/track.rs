/// Track domain type
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable audio item with its display metadata
///
/// Field names match the backend's `songs` rows so catalog payloads
/// deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    #[serde(default)]
    pub album: Option<String>,

    /// Cover image reference
    #[serde(default)]
    pub cover_image_url: String,

    /// Audio source reference (blank means not playable)
    #[serde(default)]
    pub audio_url: String,

    /// Duration in seconds, when the backend knows it
    #[serde(default)]
    pub duration_sec: Option<f64>,

    /// Total plays recorded by the backend
    #[serde(default)]
    pub play_count: Option<u64>,

    /// Short looping video preview shown in the queue
    #[serde(default)]
    pub video_url: Option<String>,

    /// When the track was added to the catalog
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: i64, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: artist.into(),
            album: None,
            cover_image_url: String::new(),
            audio_url: String::new(),
            duration_sec: None,
            play_count: None,
            video_url: None,
            created_at: None,
        }
    }

    /// Set the audio source reference
    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = url.into();
        self
    }

    /// Set the album name
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the preview video reference
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    /// Set the known duration in seconds
    pub fn with_duration_sec(mut self, secs: f64) -> Self {
        self.duration_sec = Some(secs);
        self
    }

    /// Audio source to hand to a playback element, if any
    pub fn playable_source(&self) -> Option<&str> {
        let url = self.audio_url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// Preview video reference, if any
    pub fn preview_video(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_sec
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }
}
