//! Groove - Playback Management
//!
//! Player state and media-element transport for the Groove player.
//!
//! This crate provides:
//! - Shared player state (current track, queue, queue panel visibility)
//! - Queue navigation without wrap-around
//! - Transport engine (play/pause, seek, volume, mute, repeat-one)
//! - Channel-based change notification
//! - Stale play-attempt detection across track switches
//! - Preview video policy for the queue panel
//!
//! # Architecture
//!
//! `groove-playback` is platform-agnostic. The live playback element is
//! provided through the [`MediaElement`] trait:
//! - [`SimulatedElement`]: deterministic clock, used by the CLI and tests
//! - `wasm::HtmlAudioElementAdapter`: browser `HTMLAudioElement` (`wasm` feature)
//!
//! Everything is single-threaded. Nothing calls back into caller code while
//! a mutation is in progress: [`PlayerState`] publishes [`PlayerEvent`]s,
//! elements publish [`ElementEvent`]s, and [`TransportEngine::pump`] drains
//! both.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use groove_core::{MemoryPreferences, Track};
//! use groove_playback::{PlayerConfig, PlayerState, SimulatedElement, TransportEngine};
//!
//! let mut state = PlayerState::new();
//! let mut engine = TransportEngine::new(
//!     SimulatedElement::new(),
//!     MemoryPreferences::new(),
//!     &mut state,
//!     &PlayerConfig::default(),
//! )
//! .unwrap();
//!
//! let context = vec![
//!     Track::new(1, "Opening", "Band").with_audio_url("https://cdn/1.mp3"),
//!     Track::new(2, "Closing", "Band").with_audio_url("https://cdn/2.mp3"),
//! ];
//!
//! state.play_now(context[0].clone(), Some(context));
//! engine.pump(&mut state);
//! assert!(engine.status().is_playing);
//!
//! engine.set_volume(80.0);
//! engine.toggle_mute();
//! assert_eq!(engine.status().volume, 0);
//!
//! state.play_next();
//! engine.pump(&mut state);
//! assert_eq!(engine.status().current_time, 0.0);
//! ```

mod element;
mod engine;
mod error;
mod events;
mod preview;
mod simulated;
mod state;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use element::{ListenerHandle, MediaElement};
pub use engine::TransportEngine;
pub use error::{PlaybackError, Result};
pub use events::{ElementEvent, EventBus, PlayOrigin, PlayTicket, PlayerEvent, Subscription};
pub use preview::{PreviewPolicy, PreviewVideo, QueueEntry, ReducedMotionSignal, StaticMotion};
pub use simulated::{PlayPolicy, SimulatedElement, DEFAULT_SIMULATED_DURATION};
pub use state::PlayerState;
pub use types::{format_time, PlayerConfig, TransportSnapshot, TransportStatus, DEFAULT_VOLUME};
pub use volume::Volume;
