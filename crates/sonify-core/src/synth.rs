//! Precomputed sample buffers for the beep lane and the sweep-start cue.

use crate::constants::*;
use std::f32::consts::TAU;

/// Looping beep buffer: a short sine burst with a linear fade at the head of a
/// mostly silent buffer. The loop end, not the buffer length, sets the rate.
pub fn beep_buffer(sample_rate: f32) -> Vec<f32> {
    let len = (sample_rate * BEEP_BUFFER_SEC) as usize;
    let burst = ((sample_rate * BEEP_BURST_SEC) as usize).min(len);
    let mut out = vec![0.0; len];
    let step = TAU * BEEP_TONE_HZ / sample_rate;
    let mut phase = 0.0_f32;
    let mut amp = 1.0_f32;
    for sample in out.iter_mut().take(burst) {
        *sample = phase.sin() * amp;
        phase += step;
        if phase > TAU {
            phase -= TAU;
        }
        amp -= 1.0 / burst as f32;
    }
    out
}

/// Percussive cue: an exponentially damped sinusoid of fixed length.
pub fn damped_burst(sample_rate: f32, frequency_hz: f32, duration_sec: f32, decay: f32) -> Vec<f32> {
    let len = (sample_rate * duration_sec).max(1.0) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (TAU * frequency_hz * t).sin() * (-decay * t).exp()
        })
        .collect()
}

/// The cue played at the start of each scan sweep.
pub fn sweep_cue(sample_rate: f32) -> Vec<f32> {
    damped_burst(sample_rate, CUE_TONE_HZ, CUE_DURATION_SEC, CUE_DECAY_PER_SEC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beep_buffer_is_a_burst_then_silence() {
        let sr = 8000.0;
        let buf = beep_buffer(sr);
        assert_eq!(buf.len(), 16000);
        let burst = (sr * BEEP_BURST_SEC) as usize;
        assert!(buf[..burst].iter().any(|s| s.abs() > 0.1));
        assert!(buf[burst..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn cue_decays() {
        let cue = sweep_cue(44_100.0);
        let head = cue[..200].iter().fold(0.0_f32, |m, s| m.max(s.abs()));
        let tail = cue[cue.len() - 200..]
            .iter()
            .fold(0.0_f32, |m, s| m.max(s.abs()));
        assert!(tail < head * 0.05);
    }
}
