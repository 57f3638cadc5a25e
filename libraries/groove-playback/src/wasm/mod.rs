//! WASM bindings for groove-playback
//!
//! Binds the transport engine to a browser `HTMLAudioElement`, persists the
//! volume in `localStorage`, reads the reduced-motion media query, and
//! exposes the whole player to JavaScript as [`WasmPlayer`].

pub mod element;
pub mod environment;
pub mod player;
pub mod types;

pub use element::HtmlAudioElementAdapter;
pub use environment::{LocalStoragePreferences, MediaQueryMotion};
pub use player::WasmPlayer;
pub use types::QueueEntryView;
