use crate::constants::{GAIN_SMOOTHING_SEC, RESIZE_DEBOUNCE_MS, SCAN_STEPS, SWEEP_DURATION_MS};

/// Runtime settings for a sonification session.
#[derive(Clone, Debug, PartialEq)]
pub struct SonifyConfig {
    /// Time one scanline takes to cross the projected bounds.
    pub sweep_duration_ms: f64,
    /// Number of vertical steps; the sweep covers `scan_steps + 1` lines.
    pub scan_steps: u32,
    /// Settling window for resize and fullscreen changes.
    pub resize_debounce_ms: f64,
    /// Time constant for gain changes on the audio side.
    pub gain_smoothing_sec: f64,
    /// Narration played on `play_intro`, if any.
    pub intro_url: Option<String>,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        Self {
            sweep_duration_ms: SWEEP_DURATION_MS,
            scan_steps: SCAN_STEPS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            gain_smoothing_sec: GAIN_SMOOTHING_SEC,
            intro_url: None,
        }
    }
}
