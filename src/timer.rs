use sonify_core::ScanTimer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `setInterval`-backed scan clock. The callback lives as long as the timer,
/// so cancelling from inside a tick is safe.
pub struct IntervalTimer {
    tick: Closure<dyn FnMut()>,
    handle: Option<i32>,
}

impl IntervalTimer {
    pub fn new(on_tick: impl FnMut() + 'static) -> Self {
        Self {
            tick: Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>),
            handle: None,
        }
    }
}

impl ScanTimer for IntervalTimer {
    fn start(&mut self, period_ms: f64) {
        self.cancel();
        let Some(window) = web::window() else {
            log::error!("[timer] no window");
            return;
        };
        // Browsers truncate fractional delays; the automator keeps exact time.
        let delay = period_ms.max(1.0) as i32;
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            self.tick.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(h) => {
                log::debug!("[timer] scan interval {} ms (requested {:.3})", delay, period_ms);
                self.handle = Some(h);
            }
            Err(e) => log::error!("[timer] setInterval: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let Some(h) = self.handle.take() {
            if let Some(window) = web::window() {
                window.clear_interval_with_handle(h);
            }
        }
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
