//! Playback flag for the spoken introduction.
//!
//! Browsers may refuse `play()` after it returns (autoplay policy), so the
//! flag follows what the media element reports rather than what was asked.

/// What the narration element told us.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NarrationEvent {
    Playing,
    Paused,
    Ended,
    /// The play request was rejected.
    Rejected,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NarrationState {
    playing: bool,
}

impl NarrationState {
    pub fn on_event(&mut self, event: NarrationEvent) {
        self.playing = event == NarrationEvent::Playing;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playing as the host sees it: a hidden panel reports silence.
    pub fn audible(&self, panel_visible: bool) -> bool {
        self.playing && panel_visible
    }
}
