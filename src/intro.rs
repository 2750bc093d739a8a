use sonify_core::{NarrationEvent, NarrationState};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Spoken introduction to the sonification panel.
pub struct IntroNarration {
    element: Option<web::HtmlAudioElement>,
    state: Rc<Cell<NarrationState>>,
}

fn report(state: &Cell<NarrationState>, event: NarrationEvent) {
    let mut s = state.get();
    s.on_event(event);
    state.set(s);
}

impl IntroNarration {
    pub fn new(url: Option<&str>) -> Self {
        let state = Rc::new(Cell::new(NarrationState::default()));
        let element = url.and_then(|u| match web::HtmlAudioElement::new_with_src(u) {
            Ok(el) => Some(el),
            Err(e) => {
                log::warn!("[intro] cannot load {}: {:?}", u, e);
                None
            }
        });
        if let Some(el) = &element {
            for (name, event) in [
                ("playing", NarrationEvent::Playing),
                ("pause", NarrationEvent::Paused),
                ("ended", NarrationEvent::Ended),
            ] {
                let state = state.clone();
                let cb = Closure::wrap(Box::new(move || {
                    report(&state, event);
                }) as Box<dyn FnMut()>);
                _ = el.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
                cb.forget();
            }
        }
        Self { element, state }
    }

    /// Start from the beginning, or stop. The flag flips once the element
    /// reports it is actually playing.
    pub fn play(&self, on: bool) {
        let Some(el) = &self.element else {
            if on {
                log::warn!("[intro] no narration configured");
            }
            return;
        };
        if !on {
            _ = el.pause();
            return;
        }
        el.set_current_time(0.0);
        match el.play() {
            Ok(promise) => {
                let state = self.state.clone();
                spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("[intro] playback refused: {:?}", e);
                        report(&state, NarrationEvent::Rejected);
                    }
                });
            }
            Err(e) => {
                log::warn!("[intro] play: {:?}", e);
                report(&self.state, NarrationEvent::Rejected);
            }
        }
    }

    /// Playing and shown to the user.
    pub fn is_audible(&self, panel_visible: bool) -> bool {
        self.state.get().audible(panel_visible)
    }
}
