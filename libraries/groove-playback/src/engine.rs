//! Transport engine
//!
//! Binds [`PlayerState`]'s current track to a [`MediaElement`]:
//!
//! ```text
//! PlayerState ──PlayerEvent──> TransportEngine ──set_source/play/pause──> MediaElement
//!      ^                              │  ^                                     │
//!      └──────── play_next() ─────────┘  └────────────ElementEvent─────────────┘
//!               (on Ended only)
//! ```
//!
//! Element events only ever update the engine's [`TransportStatus`]; the one
//! exception is `Ended`, which advances the queue.
//!
//! # Stale play outcomes
//!
//! Every source switch bumps a load generation and installs a fresh element
//! listener. Play attempts carry a [`PlayTicket`] with that generation, so a
//! resolution arriving after a newer track was selected is recognised and
//! ignored, and progress queued by the old listener is dropped with it.

use crate::element::{ListenerHandle, MediaElement};
use crate::error::Result;
use crate::events::{ElementEvent, PlayOrigin, PlayTicket, PlayerEvent, Subscription};
use crate::state::PlayerState;
use crate::types::{format_time, PlayerConfig, TransportSnapshot, TransportStatus};
use crate::volume::Volume;
use crossbeam_channel::{unbounded, Receiver};
use groove_core::{PreferenceStore, Track, TrackId, SETTING_VOLUME};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
struct LoadedTrack {
    id: TrackId,
    playable: bool,
}

/// Drives a playback element from the player state
///
/// Owns the element exclusively. Call [`TransportEngine::pump`] whenever the
/// state may have changed or the element may have emitted events.
pub struct TransportEngine<E: MediaElement, P: PreferenceStore> {
    element: E,
    preferences: P,
    status: TransportStatus,
    volume: Volume,
    state_events: Subscription<PlayerEvent>,
    element_events: Receiver<ElementEvent>,
    listener: Option<ListenerHandle>,
    loaded: Option<LoadedTrack>,
    generation: u64,
}

impl<E: MediaElement, P: PreferenceStore> TransportEngine<E, P> {
    /// Attach to an element and subscribe to the player state
    ///
    /// The stored volume preference is read once here; a missing or
    /// non-numeric value falls back to `config.default_volume`. If the state
    /// already has a current track it is loaded immediately.
    ///
    /// # Errors
    /// Returns an error if the element refuses the listener registration
    pub fn new(
        mut element: E,
        preferences: P,
        state: &mut PlayerState,
        config: &PlayerConfig,
    ) -> Result<Self> {
        let stored = match preferences.get(SETTING_VOLUME) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to read volume preference, using default");
                None
            }
        };
        let volume = Volume::from_preference(stored.as_deref(), config.default_volume);

        let (tx, rx) = unbounded();
        let listener = element.attach(tx)?;
        element.set_volume(volume.gain());
        element.set_loop(false);

        let mut engine = Self {
            element,
            preferences,
            status: TransportStatus::new(volume.level()),
            volume,
            state_events: state.subscribe(),
            element_events: rx,
            listener: Some(listener),
            loaded: None,
            generation: 0,
        };

        debug!(volume = engine.status.volume, "Transport engine attached");
        engine.reconcile(state);
        Ok(engine)
    }

    /// Process pending state changes and element events
    ///
    /// State changes are handled before each element event so that an
    /// `Ended`-triggered advance takes effect before anything else the old
    /// source emitted.
    pub fn pump(&mut self, state: &mut PlayerState) {
        loop {
            if self.sync_with_state(state) {
                continue;
            }
            match self.element_events.try_recv() {
                Ok(event) => self.handle_element_event(event, state),
                Err(_) => break,
            }
        }
    }

    /// Play if the element is paused, pause otherwise
    ///
    /// Inspects the element itself, not the cached flag. No-op when nothing
    /// playable is loaded; a rejected play is swallowed.
    pub fn toggle_play(&mut self) {
        let Some(loaded) = self.loaded.filter(|l| l.playable) else {
            debug!("Toggle ignored, nothing playable loaded");
            return;
        };

        if self.element.is_paused() {
            self.element.play(PlayTicket {
                generation: self.generation,
                track_id: loaded.id,
                origin: PlayOrigin::Toggle,
            });
        } else {
            self.element.pause();
        }
    }

    /// Jump to `secs`
    ///
    /// Non-finite input is ignored. The position is echoed into the status
    /// immediately; the element's next time update stays authoritative.
    pub fn seek(&mut self, secs: f64) {
        if !secs.is_finite() {
            return;
        }
        let target = secs.max(0.0);
        self.element.set_current_time(target);
        self.status.current_time = target;
    }

    /// Set volume (0-100)
    ///
    /// Non-finite input is ignored; other values are rounded and clamped.
    /// The new level is persisted.
    pub fn set_volume(&mut self, value: f64) {
        if let Some(level) = Volume::normalize(value) {
            self.apply_volume(level);
        }
    }

    /// Mute, or restore the last non-zero volume (50 if none)
    pub fn toggle_mute(&mut self) {
        let target = self.volume.toggle_mute_target();
        self.apply_volume(target);
    }

    /// Flip single-track repeat
    pub fn toggle_repeat_one(&mut self) {
        self.status.repeat_one = !self.status.repeat_one;
        self.element.set_loop(self.status.repeat_one);
        debug!(repeat_one = self.status.repeat_one, "Repeat-one toggled");
    }

    /// Whether the player bar should be shown
    pub fn is_visible(&self) -> bool {
        self.loaded.is_some_and(|l| l.playable)
    }

    /// Current transport status
    pub fn status(&self) -> &TransportStatus {
        &self.status
    }

    /// Serializable status for UI layers
    pub fn snapshot(&self) -> TransportSnapshot {
        let position = self.status.display_position();
        let duration = self.status.safe_duration();
        TransportSnapshot {
            is_playing: self.status.is_playing,
            position,
            duration,
            position_label: format_time(position),
            duration_label: format_time(duration),
            volume: self.status.volume,
            muted: self.volume.is_muted(),
            repeat_one: self.status.repeat_one,
            visible: self.is_visible(),
        }
    }

    /// Last remembered non-zero volume
    pub fn previous_volume(&self) -> Option<u8> {
        self.volume.previous()
    }

    /// Output level applied to the element (0.0-1.0)
    pub fn volume_level(&self) -> f64 {
        self.volume.gain()
    }

    /// Current load generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The driven element
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Mutable access to the element, for advancing simulated clocks
    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// The preference store
    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    fn sync_with_state(&mut self, state: &PlayerState) -> bool {
        let mut track_changed = false;
        while let Some(event) = self.state_events.try_recv() {
            if matches!(event, PlayerEvent::CurrentTrackChanged { .. }) {
                track_changed = true;
            }
        }
        track_changed && self.reconcile(state)
    }

    fn reconcile(&mut self, state: &PlayerState) -> bool {
        let target = state.current_track().map(|t| t.id);
        if target == self.loaded.map(|l| l.id) {
            return false;
        }
        self.load(state.current_track());
        true
    }

    fn load(&mut self, track: Option<&Track>) {
        self.generation += 1;
        self.status.current_time = 0.0;
        self.status.duration = 0.0;
        self.status.is_playing = false;
        self.rebind_listener();

        let Some(track) = track else {
            self.unload();
            self.loaded = None;
            debug!(generation = self.generation, "Cleared current track");
            return;
        };

        let Some(src) = track.playable_source() else {
            self.unload();
            self.loaded = Some(LoadedTrack {
                id: track.id,
                playable: false,
            });
            debug!(track_id = %track.id, "Track has no playable source");
            return;
        };

        self.element.set_source(Some(src));
        self.element.set_loop(self.status.repeat_one);
        self.element.set_volume(self.volume.gain());
        self.loaded = Some(LoadedTrack {
            id: track.id,
            playable: true,
        });

        info!(
            track_id = %track.id,
            title = %track.title,
            artist = %track.artist,
            generation = self.generation,
            "Loading track"
        );

        self.element.play(PlayTicket {
            generation: self.generation,
            track_id: track.id,
            origin: PlayOrigin::TrackChange,
        });
    }

    fn unload(&mut self) {
        self.element.pause();
        self.element.set_source(None);
    }

    fn rebind_listener(&mut self) {
        if let Some(handle) = self.listener.take() {
            self.element.detach(handle);
        }

        // Replacing the receiver drops anything the old listener queued.
        let (tx, rx) = unbounded();
        self.element_events = rx;
        match self.element.attach(tx) {
            Ok(handle) => self.listener = Some(handle),
            Err(e) => warn!(error = %e, "Failed to attach playback element listener"),
        }
    }

    fn handle_element_event(&mut self, event: ElementEvent, state: &mut PlayerState) {
        match event {
            ElementEvent::Play => self.status.is_playing = true,
            ElementEvent::Pause => self.status.is_playing = false,
            ElementEvent::TimeUpdate { position } => {
                self.status.current_time = if position.is_finite() && position > 0.0 {
                    position
                } else {
                    0.0
                };
            }
            ElementEvent::LoadedMetadata { duration } | ElementEvent::DurationChange { duration } => {
                self.status.duration = if duration.is_finite() && duration > 0.0 {
                    duration
                } else {
                    0.0
                };
            }
            ElementEvent::Ended => {
                if self.status.repeat_one || self.element.is_looping() {
                    debug!("Ended while repeating, not advancing");
                } else if !state.play_next() {
                    debug!("Reached end of queue");
                }
            }
            ElementEvent::PlayResolved { ticket } => {
                if self.is_current(&ticket) {
                    self.status.is_playing = true;
                } else {
                    debug!(
                        generation = ticket.generation,
                        current = self.generation,
                        "Ignoring stale play resolution"
                    );
                }
            }
            ElementEvent::PlayRejected { ticket, reason } => {
                if self.is_current(&ticket) {
                    self.status.is_playing = false;
                    debug!(track_id = %ticket.track_id, origin = ?ticket.origin, %reason, "Play attempt rejected");
                } else {
                    debug!(generation = ticket.generation, %reason, "Ignoring stale play rejection");
                }
            }
        }
    }

    fn is_current(&self, ticket: &PlayTicket) -> bool {
        ticket.generation == self.generation
            && self.loaded.is_some_and(|l| l.id == ticket.track_id)
    }

    fn apply_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.status.volume = self.volume.level();
        self.element.set_volume(self.volume.gain());

        if let Err(e) = self
            .preferences
            .set(SETTING_VOLUME, &self.status.volume.to_string())
        {
            warn!(error = %e, "Failed to persist volume preference");
        }
    }
}

impl<E: MediaElement, P: PreferenceStore> Drop for TransportEngine<E, P> {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            self.element.detach(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{PlayPolicy, SimulatedElement};
    use groove_core::MemoryPreferences;

    fn create_track(id: i64) -> Track {
        Track::new(id, format!("Track {id}"), "Artist").with_audio_url(format!("/a/{id}.mp3"))
    }

    fn setup(prefs: MemoryPreferences) -> (PlayerState, TransportEngine<SimulatedElement, MemoryPreferences>) {
        let mut state = PlayerState::new();
        let engine = TransportEngine::new(
            SimulatedElement::new().with_default_duration(10.0),
            prefs,
            &mut state,
            &PlayerConfig::default(),
        )
        .unwrap();
        (state, engine)
    }

    #[test]
    fn volume_seeded_from_preference() {
        let (_, engine) = setup(MemoryPreferences::with_value(SETTING_VOLUME, "30"));
        assert_eq!(engine.status().volume, 30);
        assert_eq!(engine.previous_volume(), Some(30));
        assert!((engine.element().volume() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn garbage_preference_falls_back() {
        let (_, engine) = setup(MemoryPreferences::with_value(SETTING_VOLUME, "abc"));
        assert_eq!(engine.status().volume, 50);
    }

    #[test]
    fn track_change_starts_playback() {
        let (mut state, mut engine) = setup(MemoryPreferences::new());
        state.play_now(create_track(1), None);
        engine.pump(&mut state);

        assert!(engine.status().is_playing);
        assert!(engine.is_visible());
        assert_eq!(engine.element().source(), Some("/a/1.mp3"));
        assert_eq!(engine.generation(), 1);
    }

    #[test]
    fn unplayable_track_hides_bar() {
        let (mut state, mut engine) = setup(MemoryPreferences::new());
        state.play_now(Track::new(5, "Blank", "Nobody"), None);
        engine.pump(&mut state);

        assert!(!engine.status().is_playing);
        assert!(!engine.is_visible());
        assert!(engine.element().source().is_none());

        engine.toggle_play();
        engine.pump(&mut state);
        assert!(!engine.status().is_playing);
    }

    #[test]
    fn rejected_autoplay_degrades_quietly() {
        let (mut state, mut engine) = setup(MemoryPreferences::new());
        engine
            .element_mut()
            .set_play_policy(PlayPolicy::Reject("NotAllowedError".to_string()));

        state.play_now(create_track(1), None);
        engine.pump(&mut state);

        assert!(!engine.status().is_playing);
        assert!(engine.is_visible());
    }

    #[test]
    fn one_listener_across_switches() {
        let (mut state, mut engine) = setup(MemoryPreferences::new());
        let context = vec![create_track(1), create_track(2), create_track(3)];
        state.play_now(create_track(1), Some(context));
        engine.pump(&mut state);
        state.play_next();
        engine.pump(&mut state);
        state.play_next();
        engine.pump(&mut state);

        assert_eq!(engine.element().listener_count(), 1);
        assert_eq!(engine.generation(), 3);
    }

    #[test]
    fn snapshot_labels() {
        let (mut state, mut engine) = setup(MemoryPreferences::new());
        state.play_now(create_track(1), None);
        engine.pump(&mut state);
        engine.element_mut().tick(65.0);
        engine.pump(&mut state);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.duration_label, "0:10");
        assert!(snapshot.visible);
        assert!(!snapshot.muted);
    }
}
