//! Automated scanline sweep over the projected bounds.
//!
//! Driven by a fixed-interval timer owned by the frontend. Each tick advances
//! a virtual pointer left to right across the bounds; after a full sweep the
//! line steps down. The automator reports `Finished` once the last line is
//! done, and the session then tears scanning down.

use crate::config::SonifyConfig;
use crate::geometry::ProjectedBounds;
use glam::Vec2;

// Absorbs float drift when the increment does not divide the sweep evenly.
const SWEEP_EPSILON_MS: f64 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScanState {
    pub elapsed_ms: f64,
    pub line_index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScanTick {
    /// Feed this synthetic pointer position into the sampler.
    Sample { x: f32, y: f32, cue: bool },
    /// Every line has been swept.
    Finished,
}

#[derive(Clone, Debug)]
pub struct ScanlineAutomator {
    bounds: ProjectedBounds,
    sweep_ms: f64,
    steps: u32,
    increment_ms: f64,
    state: ScanState,
    scanline: Vec2,
    started: bool,
}

impl ScanlineAutomator {
    /// Fresh sweep over `bounds` with state reset to zero.
    pub fn start(bounds: ProjectedBounds, config: &SonifyConfig) -> Self {
        let width_px = (bounds.width as f64).max(1.0);
        Self {
            bounds,
            sweep_ms: config.sweep_duration_ms,
            steps: config.scan_steps.max(1),
            increment_ms: config.sweep_duration_ms / width_px,
            state: ScanState::default(),
            scanline: Vec2::new(bounds.min_x, bounds.min_y),
            started: false,
        }
    }

    /// Timer period; one tick per projected pixel of width.
    #[inline]
    pub fn tick_interval_ms(&self) -> f64 {
        self.increment_ms
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current scanline position, for the visual overlay.
    pub fn scanline(&self) -> Vec2 {
        self.scanline
    }

    fn position(&self) -> Vec2 {
        let b = &self.bounds;
        let progress = (self.state.elapsed_ms / self.sweep_ms) as f32;
        Vec2::new(
            b.min_x + b.width * progress,
            b.min_y + (b.height / self.steps as f32) * self.state.line_index as f32,
        )
    }

    pub fn tick(&mut self) -> ScanTick {
        let cue = !self.started;
        self.started = true;

        self.state.elapsed_ms += self.increment_ms;
        self.scanline = self.position();

        if self.state.elapsed_ms + SWEEP_EPSILON_MS >= self.sweep_ms {
            self.state.line_index += 1;
            self.state.elapsed_ms = 0.0;
        }
        if self.state.line_index > self.steps {
            return ScanTick::Finished;
        }

        let p = self.position();
        ScanTick::Sample { x: p.x, y: p.y, cue }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_only_on_first_tick() {
        let bounds = ProjectedBounds {
            min_x: 0.0,
            min_y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let mut scan = ScanlineAutomator::start(bounds, &SonifyConfig::default());
        let cues = (0..50)
            .filter(|_| matches!(scan.tick(), ScanTick::Sample { cue: true, .. }))
            .count();
        assert_eq!(cues, 1);
    }
}
