//! Platform-agnostic playback element trait
//!
//! Abstracts the live media element the transport engine drives (a browser
//! `HTMLAudioElement` under the `wasm` feature, [`crate::SimulatedElement`]
//! for the CLI and tests).

use crate::error::Result;
use crate::events::{ElementEvent, PlayTicket};
use crossbeam_channel::Sender;

/// Registration token returned by [`MediaElement::attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    /// Wrap a raw registration id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw registration id
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Playback element driven by [`crate::TransportEngine`]
///
/// Implementors own a single audio output. Transport commands are
/// fire-and-forget: `play` never reports its outcome synchronously, the
/// element emits [`ElementEvent::PlayResolved`] or
/// [`ElementEvent::PlayRejected`] carrying the same ticket instead.
pub trait MediaElement {
    /// Replace the source reference (None unloads the element)
    ///
    /// Pending play attempts for the old source are rejected.
    fn set_source(&mut self, src: Option<&str>);

    /// Current source reference
    fn source(&self) -> Option<&str>;

    /// Start playback asynchronously
    fn play(&mut self, ticket: PlayTicket);

    /// Pause playback
    fn pause(&mut self);

    /// Actual paused state of the element
    fn is_paused(&self) -> bool;

    /// Set playback position in seconds
    fn set_current_time(&mut self, secs: f64);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    /// Source duration in seconds (NaN when unknown)
    fn duration(&self) -> f64;

    /// Set native single-track looping
    fn set_loop(&mut self, looping: bool);

    /// Whether native looping is enabled
    fn is_looping(&self) -> bool;

    /// Set output level (0.0-1.0)
    fn set_volume(&mut self, level: f64);

    /// Output level (0.0-1.0)
    fn volume(&self) -> f64;

    /// Register an event sink
    ///
    /// # Errors
    /// Returns an error if the element cannot install its listeners
    fn attach(&mut self, sink: Sender<ElementEvent>) -> Result<ListenerHandle>;

    /// Remove a previously registered sink
    ///
    /// Unknown handles are ignored.
    fn detach(&mut self, handle: ListenerHandle);
}
