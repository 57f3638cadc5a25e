//! Preview video policy
//!
//! Queue entries can carry a short looping video. Whether it autoplays is the
//! only thing the reduced-motion preference decides; audio is unaffected.

use groove_core::Track;
use serde::{Deserialize, Serialize};

/// Environmental reduced-motion preference
pub trait ReducedMotionSignal {
    /// Whether the user asked for reduced motion
    fn prefers_reduced_motion(&self) -> bool;
}

/// Fixed reduced-motion answer (tests, headless sessions)
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMotion(pub bool);

impl ReducedMotionSignal for StaticMotion {
    fn prefers_reduced_motion(&self) -> bool {
        self.0
    }
}

/// Resolved preview policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPolicy {
    /// Preview videos may autoplay
    pub allow_autoplay: bool,
}

impl PreviewPolicy {
    /// Build the policy from a reduced-motion signal
    pub fn from_signal(signal: &dyn ReducedMotionSignal) -> Self {
        Self {
            allow_autoplay: !signal.prefers_reduced_motion(),
        }
    }

    /// Preview descriptor for a track, if it has a video
    pub fn preview_for(&self, track: &Track) -> Option<PreviewVideo> {
        track.preview_video().map(|src| PreviewVideo {
            src: src.to_string(),
            autoplay: self.allow_autoplay,
        })
    }
}

impl Default for PreviewPolicy {
    fn default() -> Self {
        Self {
            allow_autoplay: true,
        }
    }
}

/// Preview video shown next to a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewVideo {
    /// Video reference
    pub src: String,
    /// Start muted looping playback immediately
    pub autoplay: bool,
}

/// Row of the queue panel
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    /// Queued track
    pub track: Track,
    /// Whether this is the current track
    pub is_current: bool,
    /// Preview video, if the track has one
    pub preview: Option<PreviewVideo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_disables_autoplay() {
        let track = Track::new(1, "Clip", "Cam").with_video_url("https://cdn/v/1.mp4");

        let calm = PreviewPolicy::from_signal(&StaticMotion(true));
        let preview = calm.preview_for(&track).unwrap();
        assert!(!preview.autoplay);
        assert_eq!(preview.src, "https://cdn/v/1.mp4");

        let lively = PreviewPolicy::from_signal(&StaticMotion(false));
        assert!(lively.preview_for(&track).unwrap().autoplay);
    }

    #[test]
    fn no_video_no_preview() {
        let track = Track::new(2, "Audio only", "Mic");
        assert!(PreviewPolicy::default().preview_for(&track).is_none());
    }
}
