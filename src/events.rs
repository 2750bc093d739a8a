use crate::dom;
use crate::input;
use crate::Shared;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_input_handlers(shared: &Rc<Shared>) {
    wire_pointermove(shared);
    wire_resize(shared);
}

// Listeners hold weak references so dropping the last handle ends the session.
fn wire_pointermove(shared: &Rc<Shared>) {
    let weak: Weak<Shared> = Rc::downgrade(shared);
    let canvas = shared.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let pos = input::pointer_canvas_px(&ev, &canvas);
        if !(pos.x.is_finite() && pos.y.is_finite()) {
            return;
        }
        shared.session.borrow_mut().pointer_sample(pos.x, pos.y);
    }) as Box<dyn FnMut(_)>);
    _ = shared
        .canvas
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Window resizes and fullscreen toggles keep the canvas backing size in sync
/// and feed the session's debouncer.
fn wire_resize(shared: &Rc<Shared>) {
    let Some(window) = web::window() else {
        return;
    };
    for (target, event) in [
        (Some(window.clone().unchecked_into::<web::EventTarget>()), "resize"),
        (
            dom::window_document().map(|d| d.unchecked_into::<web::EventTarget>()),
            "fullscreenchange",
        ),
    ] {
        let Some(target) = target else {
            continue;
        };
        let weak = Rc::downgrade(shared);
        dom::add_listener(&target, event, move || {
            if let Some(shared) = weak.upgrade() {
                dom::sync_canvas_backing_size(&shared.canvas);
                let now = shared.now_ms();
                shared.session.borrow_mut().notify_resize(now);
            }
        });
    }
}
