//! WASM-compatible player wrapper
//!
//! Owns one [`PlayerState`] and one [`TransportEngine`] bound to a browser
//! audio element, and exposes them to JavaScript. DOM events schedule a pump
//! through the element notifier; JavaScript callbacks run only after the
//! session borrow is released so they may call straight back into the player.

use super::element::HtmlAudioElementAdapter;
use super::environment::{LocalStoragePreferences, MediaQueryMotion};
use super::types::{queue_from_js, to_js, track_from_js, QueueEntryView};
use crate::engine::TransportEngine;
use crate::events::{PlayerEvent, Subscription};
use crate::preview::PreviewPolicy;
use crate::state::PlayerState;
use crate::types::{PlayerConfig, TransportSnapshot};
use groove_core::TrackId;
use js_sys::Function;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;

#[derive(Default)]
struct Callbacks {
    on_track_change: Option<Function>,
    on_status_change: Option<Function>,
    on_queue_change: Option<Function>,
}

struct Session {
    state: PlayerState,
    engine: TransportEngine<HtmlAudioElementAdapter, LocalStoragePreferences>,
    changes: Subscription<PlayerEvent>,
    last_snapshot: Option<TransportSnapshot>,
    callbacks: Callbacks,
}

impl Session {
    /// Pump the engine and collect the callbacks owed to JavaScript
    fn pump(&mut self) -> Vec<(Function, JsValue)> {
        self.engine.pump(&mut self.state);

        let mut track_changed = false;
        let mut queue_changed = false;
        for event in self.changes.drain() {
            match event {
                PlayerEvent::CurrentTrackChanged { .. } => track_changed = true,
                PlayerEvent::QueueChanged { .. } | PlayerEvent::QueueModalChanged { .. } => {
                    queue_changed = true
                }
            }
        }

        let mut pending = Vec::new();
        if track_changed {
            if let Some(cb) = &self.callbacks.on_track_change {
                pending.push((cb.clone(), to_js(&self.state.current_track())));
            }
            // The current-track marker moved too.
            queue_changed = true;
        }
        if queue_changed {
            if let Some(cb) = &self.callbacks.on_queue_change {
                pending.push((cb.clone(), JsValue::NULL));
            }
        }

        let snapshot = self.engine.snapshot();
        if self.last_snapshot.as_ref() != Some(&snapshot) {
            if let Some(cb) = &self.callbacks.on_status_change {
                pending.push((cb.clone(), to_js(&snapshot)));
            }
            self.last_snapshot = Some(snapshot);
        }

        pending
    }
}

fn pump_and_dispatch(session: &RefCell<Session>) {
    let pending = match session.try_borrow_mut() {
        Ok(mut session) => session.pump(),
        // Re-entered from inside a player call; that call pumps on exit.
        Err(_) => return,
    };
    for (callback, arg) in pending {
        let _ = callback.call1(&JsValue::NULL, &arg);
    }
}

/// JavaScript-facing player
#[wasm_bindgen]
pub struct WasmPlayer {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player with its own `<audio>` element
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let slot: Rc<RefCell<Weak<RefCell<Session>>>> = Rc::new(RefCell::new(Weak::new()));
        let notify_slot = Rc::clone(&slot);

        let mut element =
            HtmlAudioElementAdapter::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        element.set_notifier(Rc::new(move || {
            let session = notify_slot.borrow().upgrade();
            if let Some(session) = session {
                pump_and_dispatch(&session);
            }
        }));

        let mut state = PlayerState::new();
        let changes = state.subscribe();
        let engine = TransportEngine::new(
            element,
            LocalStoragePreferences::new(),
            &mut state,
            &PlayerConfig::default(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let session = Rc::new(RefCell::new(Session {
            state,
            engine,
            changes,
            last_snapshot: None,
            callbacks: Callbacks::default(),
        }));
        *slot.borrow_mut() = Rc::downgrade(&session);

        Ok(Self { session })
    }

    // ===== Player State =====

    /// Play a track now, optionally with a new play context
    #[wasm_bindgen(js_name = playNow)]
    pub fn play_now(&self, track: JsValue, queue: JsValue) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        let queue = queue_from_js(queue)?;
        self.update(|s| s.state.play_now(track, queue))
    }

    /// Advance to the next queued track
    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&self) -> Result<bool, JsValue> {
        self.update(|s| s.state.play_next())
    }

    /// Go back to the previous queued track
    #[wasm_bindgen(js_name = playPrev)]
    pub fn play_prev(&self) -> Result<bool, JsValue> {
        self.update(|s| s.state.play_prev())
    }

    /// Play a track picked from the queue panel
    #[wasm_bindgen(js_name = playFromQueue)]
    pub fn play_from_queue(&self, track_id: f64) -> Result<bool, JsValue> {
        let id = TrackId::new(track_id as i64);
        self.update(|s| s.state.play_from_queue(id))
    }

    /// Show or hide the queue panel
    #[wasm_bindgen(js_name = setQueueModalOpen)]
    pub fn set_queue_modal_open(&self, open: bool) -> Result<(), JsValue> {
        self.update(|s| s.state.set_queue_modal_open(open))
    }

    /// Flip queue panel visibility
    #[wasm_bindgen(js_name = toggleQueueModal)]
    pub fn toggle_queue_modal(&self) -> Result<(), JsValue> {
        self.update(|s| s.state.toggle_queue_modal())
    }

    // ===== Transport =====

    /// Play or pause
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) -> Result<(), JsValue> {
        self.update(|s| s.engine.toggle_play())
    }

    /// Seek to position in seconds
    pub fn seek(&self, secs: f64) -> Result<(), JsValue> {
        self.update(|s| s.engine.seek(secs))
    }

    /// Set volume (0-100)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, value: f64) -> Result<(), JsValue> {
        self.update(|s| s.engine.set_volume(value))
    }

    /// Mute or restore the previous volume
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> Result<(), JsValue> {
        self.update(|s| s.engine.toggle_mute())
    }

    /// Flip single-track repeat
    #[wasm_bindgen(js_name = toggleRepeatOne)]
    pub fn toggle_repeat_one(&self) -> Result<(), JsValue> {
        self.update(|s| s.engine.toggle_repeat_one())
    }

    // ===== Queries =====

    /// Transport snapshot
    pub fn status(&self) -> Result<JsValue, JsValue> {
        self.read(|s| to_js(&s.engine.snapshot()))
    }

    /// Current track row, or null
    #[wasm_bindgen(js_name = currentTrack)]
    pub fn current_track(&self) -> Result<JsValue, JsValue> {
        self.read(|s| to_js(&s.state.current_track()))
    }

    /// Queue panel rows
    pub fn queue(&self) -> Result<JsValue, JsValue> {
        self.read(|s| {
            let policy = PreviewPolicy::from_signal(&MediaQueryMotion);
            let entries: Vec<QueueEntryView> = s
                .state
                .queue_entries(&policy)
                .into_iter()
                .map(QueueEntryView::from)
                .collect();
            to_js(&entries)
        })
    }

    /// Whether the queue panel is open
    #[wasm_bindgen(js_name = isQueueModalOpen)]
    pub fn is_queue_modal_open(&self) -> Result<bool, JsValue> {
        self.read(|s| s.state.is_queue_modal_open())
    }

    // ===== Event Listeners =====

    /// Register track change callback (receives the track row or null)
    #[wasm_bindgen(js_name = onTrackChange)]
    pub fn on_track_change(&self, callback: Function) -> Result<(), JsValue> {
        self.update(|s| s.callbacks.on_track_change = Some(callback))
    }

    /// Register status change callback (receives a transport snapshot)
    #[wasm_bindgen(js_name = onStatusChange)]
    pub fn on_status_change(&self, callback: Function) -> Result<(), JsValue> {
        self.update(|s| {
            s.callbacks.on_status_change = Some(callback);
            s.last_snapshot = None;
        })
    }

    /// Register queue change callback
    #[wasm_bindgen(js_name = onQueueChange)]
    pub fn on_queue_change(&self, callback: Function) -> Result<(), JsValue> {
        self.update(|s| s.callbacks.on_queue_change = Some(callback))
    }
}

impl WasmPlayer {
    fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Result<R, JsValue> {
        let result = {
            let mut session = self
                .session
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("player is busy"))?;
            f(&mut session)
        };
        pump_and_dispatch(&self.session);
        Ok(result)
    }

    fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> Result<R, JsValue> {
        let session = self
            .session
            .try_borrow()
            .map_err(|_| JsValue::from_str("player is busy"))?;
        Ok(f(&session))
    }
}
