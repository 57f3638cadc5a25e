//! Deterministic clock-driven playback element
//!
//! Stands in for a browser media element in the CLI and in tests. Time only
//! advances through [`SimulatedElement::tick`], and play attempts resolve,
//! reject, or stay pending according to the configured [`PlayPolicy`].

use crate::element::{ListenerHandle, MediaElement};
use crate::error::Result;
use crate::events::{ElementEvent, PlayTicket};
use crossbeam_channel::Sender;
use std::collections::HashMap;

/// Length used for sources without a registered duration
pub const DEFAULT_SIMULATED_DURATION: f64 = 180.0;

/// How the element answers `play`
#[derive(Debug, Clone, PartialEq)]
pub enum PlayPolicy {
    /// Start immediately
    Resolve,
    /// Refuse every attempt with the given reason (blocked autoplay)
    Reject(String),
    /// Keep attempts pending until resolved or rejected explicitly
    Defer,
}

/// Simulated media element
#[derive(Debug)]
pub struct SimulatedElement {
    source: Option<String>,
    paused: bool,
    position: f64,
    looping: bool,
    volume: f64,
    metadata_loaded: bool,
    durations: HashMap<String, f64>,
    default_duration: f64,
    policy: PlayPolicy,
    pending: Vec<PlayTicket>,
    listeners: Vec<(ListenerHandle, Sender<ElementEvent>)>,
    next_handle: u64,
}

impl Default for SimulatedElement {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedElement {
    /// Create an unloaded, paused element
    pub fn new() -> Self {
        Self {
            source: None,
            paused: true,
            position: 0.0,
            looping: false,
            volume: 1.0,
            metadata_loaded: false,
            durations: HashMap::new(),
            default_duration: DEFAULT_SIMULATED_DURATION,
            policy: PlayPolicy::Resolve,
            pending: Vec::new(),
            listeners: Vec::new(),
            next_handle: 0,
        }
    }

    /// Register the length of a source
    pub fn with_duration(mut self, src: impl Into<String>, secs: f64) -> Self {
        self.durations.insert(src.into(), secs);
        self
    }

    /// Length used for unregistered sources
    pub fn with_default_duration(mut self, secs: f64) -> Self {
        self.default_duration = secs;
        self
    }

    /// Set how play attempts are answered
    pub fn set_play_policy(&mut self, policy: PlayPolicy) {
        self.policy = policy;
    }

    /// Advance the clock by `elapsed` seconds
    ///
    /// Metadata for a fresh source is reported on the first tick whether or
    /// not the element is playing.
    pub fn tick(&mut self, elapsed: f64) {
        if self.source.is_none() {
            return;
        }

        let duration = self.source_duration();
        if !self.metadata_loaded {
            self.metadata_loaded = true;
            self.emit(ElementEvent::DurationChange { duration });
            self.emit(ElementEvent::LoadedMetadata { duration });
        }

        if self.paused || !elapsed.is_finite() || elapsed <= 0.0 {
            return;
        }

        self.position += elapsed;
        if !duration.is_finite() || self.position < duration {
            self.emit(ElementEvent::TimeUpdate {
                position: self.position,
            });
        } else if self.looping {
            self.position = 0.0;
            self.emit(ElementEvent::TimeUpdate { position: 0.0 });
        } else {
            self.position = duration;
            self.paused = true;
            self.emit(ElementEvent::TimeUpdate {
                position: duration,
            });
            self.emit(ElementEvent::Pause);
            self.emit(ElementEvent::Ended);
        }
    }

    /// Start every deferred play attempt
    pub fn resolve_pending(&mut self) {
        for ticket in std::mem::take(&mut self.pending) {
            self.start(ticket);
        }
    }

    /// Refuse every deferred play attempt
    pub fn reject_pending(&mut self, reason: &str) {
        for ticket in std::mem::take(&mut self.pending) {
            self.emit(ElementEvent::PlayRejected {
                ticket,
                reason: reason.to_string(),
            });
        }
    }

    /// Deliver an arbitrary event to the listeners
    pub fn emit(&mut self, event: ElementEvent) {
        self.listeners.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    /// Whether playback stopped at the end of the source
    pub fn is_ended(&self) -> bool {
        self.source.is_some()
            && self.paused
            && self.metadata_loaded
            && self.position >= self.source_duration()
    }

    /// Number of deferred play attempts
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn source_duration(&self) -> f64 {
        self.source
            .as_ref()
            .and_then(|src| self.durations.get(src).copied())
            .unwrap_or(self.default_duration)
    }

    fn start(&mut self, ticket: PlayTicket) {
        if self.is_ended() && !self.looping {
            self.position = 0.0;
        }
        if self.paused {
            self.paused = false;
            self.emit(ElementEvent::Play);
        }
        self.emit(ElementEvent::PlayResolved { ticket });
    }
}

impl MediaElement for SimulatedElement {
    fn set_source(&mut self, src: Option<&str>) {
        self.reject_pending("AbortError: the load was interrupted by a new source");
        self.source = src.map(str::to_string);
        self.paused = true;
        self.position = 0.0;
        self.metadata_loaded = false;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self, ticket: PlayTicket) {
        if self.source.is_none() {
            self.emit(ElementEvent::PlayRejected {
                ticket,
                reason: "NotSupportedError: no source".to_string(),
            });
            return;
        }

        match self.policy.clone() {
            PlayPolicy::Resolve => self.start(ticket),
            PlayPolicy::Reject(reason) => self.emit(ElementEvent::PlayRejected { ticket, reason }),
            PlayPolicy::Defer => self.pending.push(ticket),
        }
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.emit(ElementEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_current_time(&mut self, secs: f64) {
        if self.source.is_none() || !secs.is_finite() {
            return;
        }
        let mut position = secs.max(0.0);
        if self.metadata_loaded {
            position = position.min(self.source_duration());
        }
        self.position = position;
        self.emit(ElementEvent::TimeUpdate { position });
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        if self.source.is_some() && self.metadata_loaded {
            self.source_duration()
        } else {
            f64::NAN
        }
    }

    fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn is_looping(&self) -> bool {
        self.looping
    }

    fn set_volume(&mut self, level: f64) {
        if level.is_finite() {
            self.volume = level.clamp(0.0, 1.0);
        }
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn attach(&mut self, sink: Sender<ElementEvent>) -> Result<ListenerHandle> {
        self.next_handle += 1;
        let handle = ListenerHandle::new(self.next_handle);
        self.listeners.push((handle, sink));
        Ok(handle)
    }

    fn detach(&mut self, handle: ListenerHandle) {
        self.listeners.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PlayOrigin;
    use crossbeam_channel::unbounded;
    use groove_core::TrackId;

    fn ticket(generation: u64) -> PlayTicket {
        PlayTicket {
            generation,
            track_id: TrackId::new(1),
            origin: PlayOrigin::TrackChange,
        }
    }

    #[test]
    fn plays_to_the_end() {
        let mut element = SimulatedElement::new().with_duration("a.mp3", 2.0);
        let (tx, rx) = unbounded();
        element.attach(tx).unwrap();

        element.set_source(Some("a.mp3"));
        element.play(ticket(1));
        element.tick(1.0);
        element.tick(1.5);

        let events: Vec<ElementEvent> = rx.try_iter().collect();
        assert_eq!(events[0], ElementEvent::Play);
        assert_eq!(events[1], ElementEvent::PlayResolved { ticket: ticket(1) });
        assert!(matches!(events[2], ElementEvent::DurationChange { .. }));
        assert!(matches!(events[3], ElementEvent::LoadedMetadata { .. }));
        assert_eq!(events.last(), Some(&ElementEvent::Ended));
        assert!(element.is_ended());
        assert!(element.is_paused());
    }

    #[test]
    fn looping_never_ends() {
        let mut element = SimulatedElement::new().with_default_duration(1.0);
        let (tx, rx) = unbounded();
        element.attach(tx).unwrap();

        element.set_source(Some("x.mp3"));
        element.set_loop(true);
        element.play(ticket(1));
        for _ in 0..5 {
            element.tick(0.6);
        }

        assert!(rx.try_iter().all(|e| e != ElementEvent::Ended));
        assert!(!element.is_paused());
    }

    #[test]
    fn new_source_aborts_pending_play() {
        let mut element = SimulatedElement::new();
        element.set_play_policy(PlayPolicy::Defer);
        let (tx, rx) = unbounded();
        element.attach(tx).unwrap();

        element.set_source(Some("a.mp3"));
        element.play(ticket(1));
        assert_eq!(element.pending_count(), 1);

        element.set_source(Some("b.mp3"));
        assert_eq!(element.pending_count(), 0);
        assert!(matches!(
            rx.try_recv().unwrap(),
            ElementEvent::PlayRejected { ticket: t, .. } if t.generation == 1
        ));
    }

    #[test]
    fn detach_stops_delivery() {
        let mut element = SimulatedElement::new();
        let (tx, rx) = unbounded();
        let handle = element.attach(tx).unwrap();
        element.detach(handle);

        element.set_source(Some("a.mp3"));
        element.play(ticket(1));

        assert_eq!(element.listener_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn duration_unknown_until_metadata() {
        let mut element = SimulatedElement::new().with_duration("a.mp3", 30.0);
        element.set_source(Some("a.mp3"));
        assert!(element.duration().is_nan());

        element.tick(0.0);
        assert_eq!(element.duration(), 30.0);
    }
}
