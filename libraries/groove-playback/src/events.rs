//! Playback Events
//!
//! Event-based communication between the player state, the transport engine
//! and the playback element. Nothing here calls back into caller code:
//! publishers push into channels and consumers drain them on their own turn.
//!
//! - [`PlayerEvent`]: emitted by [`crate::PlayerState`] on every mutation
//! - [`ElementEvent`]: emitted by a [`crate::MediaElement`] (lifecycle signals
//!   and play outcomes)

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use groove_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Current track identity changed
    CurrentTrackChanged {
        /// ID of the new current track (None = nothing selected)
        track_id: Option<TrackId>,
        /// ID of the previous current track
        previous_track_id: Option<TrackId>,
    },

    /// Queue replaced by a new play context
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Queue panel opened or closed
    QueueModalChanged {
        /// Whether the panel is open
        open: bool,
    },
}

/// Why a play attempt was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOrigin {
    /// Automatic start after the current track changed
    TrackChange,
    /// User pressed play
    Toggle,
}

/// Identifies one asynchronous play attempt
///
/// The element echoes the ticket back in [`ElementEvent::PlayResolved`] or
/// [`ElementEvent::PlayRejected`]. A ticket whose generation is older than the
/// engine's current load generation is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTicket {
    /// Load generation the attempt belongs to
    pub generation: u64,
    /// Track the attempt was issued for
    pub track_id: TrackId,
    /// What triggered the attempt
    pub origin: PlayOrigin,
}

/// Signals emitted by a playback element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementEvent {
    /// Element started playing
    Play,
    /// Element paused (including at end of track)
    Pause,
    /// Periodic progress
    TimeUpdate {
        /// Current position in seconds
        position: f64,
    },
    /// Metadata for the current source is ready
    LoadedMetadata {
        /// Source duration in seconds (may be non-finite)
        duration: f64,
    },
    /// Source duration changed
    DurationChange {
        /// Source duration in seconds (may be non-finite)
        duration: f64,
    },
    /// Reached end of track while not looping
    Ended,
    /// A play attempt succeeded
    PlayResolved {
        /// Ticket the attempt was issued with
        ticket: PlayTicket,
    },
    /// A play attempt was rejected (autoplay policy, unsupported source, aborted load)
    PlayRejected {
        /// Ticket the attempt was issued with
        ticket: PlayTicket,
        /// Element-provided reason
        reason: String,
    },
}

/// Fan-out publisher over unbounded channels
///
/// Disconnected subscribers are pruned on the next publish.
#[derive(Debug)]
pub struct EventBus<E> {
    subscribers: Vec<Sender<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E: Clone> EventBus<E> {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Subscription<E> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        Subscription { rx }
    }

    /// Deliver an event to every live subscriber
    pub fn publish(&mut self, event: E) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers (as of the last publish)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of an [`EventBus`] subscription
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<E> {
    rx: Receiver<E>,
}

impl<E> Subscription<E> {
    /// Take the next pending event, if any
    pub fn try_recv(&self) -> Option<E> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Take every pending event
    pub fn drain(&self) -> Vec<E> {
        self.rx.try_iter().collect()
    }

    /// Whether events are waiting
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
