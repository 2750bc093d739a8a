/// Coalesces bursts of events into one trigger after a quiet window.
///
/// Timestamps are milliseconds from any monotonic clock the caller owns.
#[derive(Clone, Debug)]
pub struct Debouncer {
    window_ms: f64,
    last_event_ms: Option<f64>,
}

impl Debouncer {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_event_ms: None,
        }
    }

    /// Record an event; restarts the window.
    pub fn poke(&mut self, now_ms: f64) {
        self.last_event_ms = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.last_event_ms.is_some()
    }

    /// True once, when the window has passed since the last event.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.last_event_ms {
            Some(t) if now_ms - t >= self.window_ms => {
                self.last_event_ms = None;
                true
            }
            _ => false,
        }
    }
}
