//! `HTMLAudioElement` playback element

use crate::element::{ListenerHandle, MediaElement};
use crate::error::{PlaybackError, Result};
use crate::events::{ElementEvent, PlayTicket};
use crossbeam_channel::Sender;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAudioElement, HtmlMediaElement};

/// DOM events mirrored into [`ElementEvent`]s
const SIGNALS: [&str; 6] = [
    "play",
    "pause",
    "timeupdate",
    "loadedmetadata",
    "durationchange",
    "ended",
];

struct Registration {
    handle: ListenerHandle,
    callbacks: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

/// Browser audio element driven by the transport engine
///
/// DOM callbacks only push into the attached channels and then invoke the
/// optional notifier, which the owner uses to schedule a pump.
pub struct HtmlAudioElementAdapter {
    audio: HtmlAudioElement,
    source: Option<String>,
    sinks: Vec<(ListenerHandle, Sender<ElementEvent>)>,
    registrations: Vec<Registration>,
    next_handle: u64,
    notify: Option<Rc<dyn Fn()>>,
}

impl HtmlAudioElementAdapter {
    /// Create a detached `<audio>` element
    ///
    /// # Errors
    /// Returns an error if the document refuses to create the element
    pub fn new() -> Result<Self> {
        let audio = HtmlAudioElement::new()
            .map_err(|e| PlaybackError::Element(format!("cannot create audio element: {e:?}")))?;
        Ok(Self::from_element(audio))
    }

    /// Wrap an existing `<audio>` element
    pub fn from_element(audio: HtmlAudioElement) -> Self {
        Self {
            audio,
            source: None,
            sinks: Vec::new(),
            registrations: Vec::new(),
            next_handle: 0,
            notify: None,
        }
    }

    /// Callback run after every delivered event
    ///
    /// Only affects listeners attached afterwards.
    pub fn set_notifier(&mut self, notify: Rc<dyn Fn()>) {
        self.notify = Some(notify);
    }

    /// Underlying DOM element
    pub fn audio(&self) -> &HtmlAudioElement {
        &self.audio
    }

    fn media(&self) -> &HtmlMediaElement {
        &self.audio
    }

    fn broadcast(&self, event: ElementEvent) {
        for (_, sink) in &self.sinks {
            let _ = sink.send(event.clone());
        }
        if let Some(notify) = &self.notify {
            notify();
        }
    }
}

fn read_signal(kind: &str, media: &HtmlMediaElement) -> ElementEvent {
    match kind {
        "play" => ElementEvent::Play,
        "pause" => ElementEvent::Pause,
        "timeupdate" => ElementEvent::TimeUpdate {
            position: media.current_time(),
        },
        "loadedmetadata" => ElementEvent::LoadedMetadata {
            duration: media.duration(),
        },
        "durationchange" => ElementEvent::DurationChange {
            duration: media.duration(),
        },
        _ => ElementEvent::Ended,
    }
}

fn outcome_callback(
    sinks: Vec<Sender<ElementEvent>>,
    notify: Option<Rc<dyn Fn()>>,
    outcome: impl FnOnce(JsValue) -> ElementEvent + 'static,
) -> Closure<dyn FnMut(JsValue)> {
    Closure::once(move |value: JsValue| {
        let event = outcome(value);
        for sink in &sinks {
            let _ = sink.send(event.clone());
        }
        if let Some(notify) = &notify {
            notify();
        }
    })
}

impl MediaElement for HtmlAudioElementAdapter {
    fn set_source(&mut self, src: Option<&str>) {
        match src {
            Some(src) => self.media().set_src(src),
            None => {
                let _ = self.audio.remove_attribute("src");
                self.media().load();
            }
        }
        self.source = src.map(str::to_string);
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self, ticket: PlayTicket) {
        let promise = match self.media().play() {
            Ok(promise) => promise,
            Err(e) => {
                self.broadcast(ElementEvent::PlayRejected {
                    ticket,
                    reason: format!("{e:?}"),
                });
                return;
            }
        };

        let sinks: Vec<Sender<ElementEvent>> =
            self.sinks.iter().map(|(_, sink)| sink.clone()).collect();

        let on_resolve = outcome_callback(sinks.clone(), self.notify.clone(), move |_| {
            ElementEvent::PlayResolved { ticket }
        });
        let on_reject = outcome_callback(sinks, self.notify.clone(), move |reason| {
            ElementEvent::PlayRejected {
                ticket,
                reason: reason
                    .as_string()
                    .unwrap_or_else(|| format!("{reason:?}")),
            }
        });

        let _ = promise.then2(&on_resolve, &on_reject);
        // Only one of the two ever runs; both must outlive the promise.
        on_resolve.forget();
        on_reject.forget();
    }

    fn pause(&mut self) {
        let _ = self.media().pause();
    }

    fn is_paused(&self) -> bool {
        self.media().paused()
    }

    fn set_current_time(&mut self, secs: f64) {
        self.media().set_current_time(secs);
    }

    fn current_time(&self) -> f64 {
        self.media().current_time()
    }

    fn duration(&self) -> f64 {
        self.media().duration()
    }

    fn set_loop(&mut self, looping: bool) {
        self.media().set_loop(looping);
    }

    fn is_looping(&self) -> bool {
        self.media().loop_()
    }

    fn set_volume(&mut self, level: f64) {
        if level.is_finite() {
            self.media().set_volume(level.clamp(0.0, 1.0));
        }
    }

    fn volume(&self) -> f64 {
        self.media().volume()
    }

    fn attach(&mut self, sink: Sender<ElementEvent>) -> Result<ListenerHandle> {
        self.next_handle += 1;
        let handle = ListenerHandle::new(self.next_handle);

        let mut callbacks = Vec::with_capacity(SIGNALS.len());
        for kind in SIGNALS {
            let media: HtmlMediaElement = self.media().clone();
            let sink = sink.clone();
            let notify = self.notify.clone();
            let callback = Closure::wrap(Box::new(move || {
                if sink.send(read_signal(kind, &media)).is_ok() {
                    if let Some(notify) = &notify {
                        notify();
                    }
                }
            }) as Box<dyn FnMut()>);

            if let Err(e) = self
                .audio
                .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            {
                for (kind, callback) in &callbacks {
                    let _ = self
                        .audio
                        .remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
                }
                return Err(PlaybackError::Element(format!(
                    "cannot listen for {kind}: {e:?}"
                )));
            }
            callbacks.push((kind, callback));
        }

        self.sinks.push((handle, sink));
        self.registrations.push(Registration { handle, callbacks });
        Ok(handle)
    }

    fn detach(&mut self, handle: ListenerHandle) {
        self.sinks.retain(|(h, _)| *h != handle);

        let Some(index) = self.registrations.iter().position(|r| r.handle == handle) else {
            return;
        };
        let registration = self.registrations.swap_remove(index);
        for (kind, callback) in &registration.callbacks {
            let _ = self
                .audio
                .remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
        }
    }
}

impl Drop for HtmlAudioElementAdapter {
    fn drop(&mut self) {
        let handles: Vec<ListenerHandle> = self.registrations.iter().map(|r| r.handle).collect();
        for handle in handles {
            self.detach(handle);
        }
        let _ = self.media().pause();
    }
}
