//! Shared player state
//!
//! Owns "what is playing" and "what comes next":
//!
//! ```text
//! Queue (play context, insertion order):
//!   - Track A
//!   - Track B   <- current track
//!   - Track C
//! ```
//!
//! Navigation is by track id within the queue, without wrap-around. Every
//! mutation goes through the methods below and is published to subscribers
//! as a [`PlayerEvent`].

use crate::events::{EventBus, PlayerEvent, Subscription};
use crate::preview::{PreviewPolicy, QueueEntry};
use groove_core::{Track, TrackId};

/// Per-session player state
///
/// Created empty when the session starts. Read by any number of surfaces,
/// mutated only through its operations.
#[derive(Debug, Default)]
pub struct PlayerState {
    current_track: Option<Track>,
    queue: Vec<Track>,
    queue_modal_open: bool,
    events: EventBus<PlayerEvent>,
}

impl PlayerState {
    /// Create empty state (nothing selected, empty queue)
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to state changes
    pub fn subscribe(&mut self) -> Subscription<PlayerEvent> {
        self.events.subscribe()
    }

    /// Play a track immediately, optionally adopting a new play context
    ///
    /// - Non-empty `queue` containing the track: adopted as-is
    /// - Non-empty `queue` without the track: adopted with the track prepended
    /// - No queue (or empty) and the current queue is empty: queue becomes `[track]`
    /// - No queue (or empty) otherwise: queue unchanged
    pub fn play_now(&mut self, track: Track, queue: Option<Vec<Track>>) {
        match queue.filter(|q| !q.is_empty()) {
            Some(mut context) => {
                if !context.iter().any(|t| t.id == track.id) {
                    context.insert(0, track.clone());
                }
                self.replace_queue(context);
            }
            None if self.queue.is_empty() => {
                self.replace_queue(vec![track.clone()]);
            }
            None => {}
        }

        self.set_current(Some(track));
    }

    /// Advance to the next queued track
    ///
    /// Returns false (no-op) when nothing is selected, the current track is
    /// not queued, or it is already last.
    pub fn play_next(&mut self) -> bool {
        let next = self
            .index_of_current()
            .and_then(|index| self.queue.get(index + 1))
            .cloned();

        match next {
            Some(track) => {
                self.set_current(Some(track));
                true
            }
            None => false,
        }
    }

    /// Go back to the previous queued track
    ///
    /// Returns false (no-op) when nothing is selected, the current track is
    /// not queued, or it is already first.
    pub fn play_prev(&mut self) -> bool {
        let prev = self
            .index_of_current()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| self.queue.get(index))
            .cloned();

        match prev {
            Some(track) => {
                self.set_current(Some(track));
                true
            }
            None => false,
        }
    }

    /// Play a track picked from the queue panel
    ///
    /// Keeps the current queue as the play context. Returns false when the id
    /// is not queued.
    pub fn play_from_queue(&mut self, id: TrackId) -> bool {
        let Some(track) = self.queue.iter().find(|t| t.id == id).cloned() else {
            return false;
        };
        let context = self.queue.clone();
        self.play_now(track, Some(context));
        true
    }

    /// Show or hide the queue panel
    pub fn set_queue_modal_open(&mut self, open: bool) {
        self.queue_modal_open = open;
        self.events.publish(PlayerEvent::QueueModalChanged { open });
    }

    /// Flip queue panel visibility
    pub fn toggle_queue_modal(&mut self) {
        self.set_queue_modal_open(!self.queue_modal_open);
    }

    /// Currently selected track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Ordered play context
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Whether the queue panel is open
    pub fn is_queue_modal_open(&self) -> bool {
        self.queue_modal_open
    }

    /// Position of the current track in the queue
    pub fn index_of_current(&self) -> Option<usize> {
        let current = self.current_track.as_ref()?;
        self.queue.iter().position(|t| t.id == current.id)
    }

    /// Whether `play_next` would move
    pub fn has_next(&self) -> bool {
        self.index_of_current()
            .is_some_and(|index| index + 1 < self.queue.len())
    }

    /// Whether `play_prev` would move
    pub fn has_prev(&self) -> bool {
        self.index_of_current().is_some_and(|index| index > 0)
    }

    /// Queue panel rows
    pub fn queue_entries(&self, policy: &PreviewPolicy) -> Vec<QueueEntry> {
        let current_id = self.current_track.as_ref().map(|t| t.id);
        self.queue
            .iter()
            .map(|track| QueueEntry {
                track: track.clone(),
                is_current: Some(track.id) == current_id,
                preview: policy.preview_for(track),
            })
            .collect()
    }

    /// Current track as a queue panel row
    pub fn now_playing(&self, policy: &PreviewPolicy) -> Option<QueueEntry> {
        self.current_track.as_ref().map(|track| QueueEntry {
            track: track.clone(),
            is_current: true,
            preview: policy.preview_for(track),
        })
    }

    fn replace_queue(&mut self, queue: Vec<Track>) {
        self.queue = queue;
        self.events.publish(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn set_current(&mut self, track: Option<Track>) {
        let previous_track_id = self.current_track.as_ref().map(|t| t.id);
        let track_id = track.as_ref().map(|t| t.id);
        self.current_track = track;

        if track_id != previous_track_id {
            self.events.publish(PlayerEvent::CurrentTrackChanged {
                track_id,
                previous_track_id,
            });
        }
    }
}
