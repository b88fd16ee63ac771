//! Audio engine seam. The session controller only ever talks to this
//! interface, so the browser element can be swapped for an inert stub on
//! native builds and a scripted double in tests.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::collections::VecDeque;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

/// Signals coming back from the underlying audio element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    LoadedMetadata { duration: f64 },
    TimeUpdate { position: f64 },
    Ended,
    Waiting,
    CanPlay,
}

/// Capability surface of the single shared audio element. Commands are
/// fire-and-forget; feedback arrives through `take_events`.
pub trait AudioEngine {
    fn load(&self, url: &str);
    fn play(&self);
    fn pause(&self);
    fn seek(&self, seconds: f64);
    fn set_volume(&self, volume: f64);
    fn position(&self) -> f64;
    fn duration(&self) -> f64;
    /// Drains events queued since the previous call, oldest first.
    fn take_events(&self) -> Vec<EngineEvent>;
}

/// Initialize the global `<audio>` element once. One DOM node is owned by
/// the whole session.
#[cfg(target_arch = "wasm32")]
fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id("tartil-audio") {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id("tartil-audio");
    audio.set_attribute("preload", "metadata").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

#[cfg(target_arch = "wasm32")]
pub struct WebAudioEngine {
    audio: HtmlAudioElement,
    events: Rc<RefCell<VecDeque<EngineEvent>>>,
}

#[cfg(target_arch = "wasm32")]
impl WebAudioEngine {
    pub fn new() -> Option<Self> {
        let audio = get_or_create_audio_element()?;
        let events = Rc::new(RefCell::new(VecDeque::new()));

        {
            let queue = Rc::clone(&events);
            let element = audio.clone();
            let callback = Closure::wrap(Box::new(move || {
                let duration = element.duration();
                let duration = if duration.is_nan() { 0.0 } else { duration };
                queue
                    .borrow_mut()
                    .push_back(EngineEvent::LoadedMetadata { duration });
            }) as Box<dyn FnMut()>);
            let _ = audio.add_event_listener_with_callback(
                "loadedmetadata",
                callback.as_ref().unchecked_ref(),
            );
            callback.forget();
        }
        {
            let queue = Rc::clone(&events);
            let element = audio.clone();
            let callback = Closure::wrap(Box::new(move || {
                queue.borrow_mut().push_back(EngineEvent::TimeUpdate {
                    position: element.current_time(),
                });
            }) as Box<dyn FnMut()>);
            let _ = audio
                .add_event_listener_with_callback("timeupdate", callback.as_ref().unchecked_ref());
            callback.forget();
        }
        // Some browsers skip re-firing canplay after a stall; "playing"
        // covers the recovery there.
        for (name, event) in [
            ("ended", EngineEvent::Ended),
            ("waiting", EngineEvent::Waiting),
            ("stalled", EngineEvent::Waiting),
            ("canplay", EngineEvent::CanPlay),
            ("playing", EngineEvent::CanPlay),
        ] {
            let queue = Rc::clone(&events);
            let callback = Closure::wrap(Box::new(move || {
                queue.borrow_mut().push_back(event);
            }) as Box<dyn FnMut()>);
            let _ = audio.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
            callback.forget();
        }

        Some(Self { audio, events })
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioEngine for WebAudioEngine {
    fn load(&self, url: &str) {
        self.audio.set_src(url);
        self.audio.load();
    }

    fn play(&self) {
        if let Ok(promise) = self.audio.play() {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
            });
        }
    }

    fn pause(&self) {
        let _ = self.audio.pause();
    }

    fn seek(&self, seconds: f64) {
        self.audio.set_current_time(seconds.max(0.0));
    }

    fn set_volume(&self, volume: f64) {
        self.audio.set_volume(volume.clamp(0.0, 1.0));
    }

    fn position(&self) -> f64 {
        self.audio.current_time()
    }

    fn duration(&self) -> f64 {
        let duration = self.audio.duration();
        if duration.is_nan() {
            0.0
        } else {
            duration
        }
    }

    fn take_events(&self) -> Vec<EngineEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

/// Inert engine used on non-wasm builds and when no document is available.
/// Real playback only exists in the browser.
#[derive(Debug, Default)]
pub struct NullEngine;

impl AudioEngine for NullEngine {
    fn load(&self, _url: &str) {}
    fn play(&self) {}
    fn pause(&self) {}
    fn seek(&self, _seconds: f64) {}
    fn set_volume(&self, _volume: f64) {}
    fn position(&self) -> f64 {
        0.0
    }
    fn duration(&self) -> f64 {
        0.0
    }
    fn take_events(&self) -> Vec<EngineEvent> {
        Vec::new()
    }
}
