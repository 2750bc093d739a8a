use crate::constants::*;
use crate::error::SonifyError;

/// Which source lane drives the output.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SonifyMode {
    /// Continuous sine whose pitch rises as the surface gets closer.
    #[default]
    Frequency = 0,
    /// Looping beep whose repetition rate rises as the surface gets closer.
    Beep = 1,
}

impl TryFrom<u8> for SonifyMode {
    type Error = SonifyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SonifyMode::Frequency),
            1 => Ok(SonifyMode::Beep),
            v => Err(SonifyError::InvalidMode(v)),
        }
    }
}

#[inline]
fn is_background(normalized_depth: f32) -> bool {
    normalized_depth <= BACKGROUND_EPSILON
}

/// Oscillator pitch for a normalized depth; empty space hums at 80 Hz.
pub fn oscillator_frequency(normalized_depth: f32) -> f32 {
    if is_background(normalized_depth) {
        BASE_FREQUENCY_HZ
    } else {
        BASE_FREQUENCY_HZ + FREQUENCY_SPAN_HZ * (1.0 - normalized_depth)
    }
}

/// Beeps per second for a normalized depth.
pub fn beep_rate(normalized_depth: f32) -> f32 {
    if is_background(normalized_depth) {
        BEEP_BACKGROUND_RATE
    } else {
        (BEEP_BPM_BASE + BEEP_BPM_SPAN * (1.0 - normalized_depth)) / 60.0
    }
}

/// Loop end (seconds) of the beep buffer that yields `beep_rate`.
#[inline]
pub fn loop_end(normalized_depth: f32) -> f64 {
    1.0 / beep_rate(normalized_depth) as f64
}

/// Per-sample audio parameters derived from one depth reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
    pub normalized_depth: f32,
    pub frequency_hz: f32,
    pub loop_end_sec: f64,
    pub gain: f32,
}

impl SampleParams {
    pub fn new(normalized_depth: f32, gain: f32) -> Self {
        Self {
            normalized_depth,
            frequency_hz: oscillator_frequency(normalized_depth),
            loop_end_sec: loop_end(normalized_depth),
            gain,
        }
    }
}
