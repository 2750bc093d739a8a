//! Session state machine tying toggles, depth field, audio graph and scan
//! automation together.
//!
//! The frontend owns exactly one `Sonifier` and routes its three event sources
//! through it: the per-frame update, pointer samples and scan timer ticks.
//! Each entry point runs to completion, so toggles land between samples.

use crate::config::SonifyConfig;
use crate::debounce::Debouncer;
use crate::error::{Result, SonifyError};
use crate::field::DepthField;
use crate::geometry::CameraPreset;
use crate::graph::{AudioGraphController, AudioOutput, GraphTuning};
use crate::mapping::{SampleParams, SonifyMode};
use crate::scan::{ScanTick, ScanlineAutomator};
use glam::Vec2;

/// Fixed-interval timer owned by the frontend for scan ticks.
pub trait ScanTimer {
    fn start(&mut self, period_ms: f64);
    fn cancel(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Active,
    Scanning,
}

/// A pending range recompute. `epoch` must be handed back with the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureRequest {
    pub epoch: u64,
    pub preset: CameraPreset,
}

pub struct Sonifier<A: AudioOutput, T: ScanTimer> {
    config: SonifyConfig,
    graph: AudioGraphController<A>,
    timer: T,
    active: bool,
    scanning: bool,
    visible: bool,
    mode: SonifyMode,
    preset: CameraPreset,
    field: Option<DepthField>,
    scan: Option<ScanlineAutomator>,
    scanline: Vec2,
    epoch: u64,
    measure_pending: bool,
    resize: Debouncer,
}

impl<A: AudioOutput, T: ScanTimer> Sonifier<A, T> {
    pub fn new(output: A, timer: T, config: SonifyConfig) -> Self {
        let tuning = GraphTuning {
            gain_smoothing_sec: config.gain_smoothing_sec,
            ..GraphTuning::default()
        };
        let resize = Debouncer::new(config.resize_debounce_ms);
        Self {
            config,
            graph: AudioGraphController::new(output, tuning),
            timer,
            active: false,
            scanning: false,
            visible: false,
            mode: SonifyMode::default(),
            preset: CameraPreset::default(),
            field: None,
            scan: None,
            scanline: Vec2::ZERO,
            epoch: 0,
            measure_pending: false,
            resize,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.scanning {
            PlaybackState::Scanning
        } else if self.active {
            PlaybackState::Active
        } else {
            PlaybackState::Idle
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn scanning(&self) -> bool {
        self.scanning
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn mode(&self) -> SonifyMode {
        self.mode
    }

    pub fn preset(&self) -> CameraPreset {
        self.preset
    }

    pub fn config(&self) -> &SonifyConfig {
        &self.config
    }

    pub fn field(&self) -> Option<&DepthField> {
        self.field.as_ref()
    }

    pub fn graph(&self) -> &AudioGraphController<A> {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut AudioGraphController<A> {
        &mut self.graph
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Latest synthetic pointer position while scanning.
    pub fn scanline(&self) -> Vec2 {
        self.scanline
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn set_active(&mut self, on: bool) -> Result<()> {
        self.set_playback(on, self.scanning && !on)
    }

    pub fn set_scanning(&mut self, on: bool) -> Result<()> {
        self.set_playback(self.active && !on, on)
    }

    // Enabling one toggle forces the other off; any change rebuilds from Idle.
    fn set_playback(&mut self, active: bool, scanning: bool) -> Result<()> {
        if active == self.active && scanning == self.scanning {
            return Ok(());
        }
        self.teardown();
        self.active = active;
        self.scanning = scanning;
        if !(active || scanning) {
            return Ok(());
        }
        if let Err(e) = self.graph.start(self.mode) {
            log::warn!("[sonify] activation failed: {e}");
            self.active = false;
            self.scanning = false;
            return Err(e);
        }
        log::info!("[sonify] {:?}", self.state());
        self.request_measurement();
        Ok(())
    }

    // Drop to Idle after a failure outside a toggle call.
    fn shut_down(&mut self) {
        self.teardown();
        self.active = false;
        self.scanning = false;
        log::info!("[sonify] {:?}", self.state());
    }

    /// Stop audio, cancel the scan timer and drop the epoch's depth field.
    fn teardown(&mut self) {
        if self.scan.take().is_some() {
            self.timer.cancel();
        }
        self.graph.stop();
        self.field = None;
    }

    /// Switch the source lane. Same-mode requests are rejected untouched.
    pub fn set_mode(&mut self, mode: SonifyMode) -> bool {
        if mode == self.mode {
            return false;
        }
        if let Err(e) = self.graph.switch_mode(mode) {
            log::warn!("[sonify] mode switch to {mode:?} failed: {e}");
            if !self.graph.is_live() && (self.active || self.scanning) {
                self.shut_down();
            }
            return false;
        }
        self.mode = mode;
        true
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.request_measurement();
        }
    }

    pub fn set_camera_preset(&mut self, preset: CameraPreset) {
        if preset == self.preset {
            return;
        }
        self.preset = preset;
        if self.wants_field() {
            self.request_measurement();
        }
    }

    /// The host replaced the model or asked for a fresh range.
    pub fn scene_changed(&mut self) {
        if self.wants_field() {
            self.request_measurement();
        }
    }

    /// Record a resize or fullscreen change; the recompute waits for the
    /// debounce window in `frame_update`.
    pub fn notify_resize(&mut self, now_ms: f64) {
        self.resize.poke(now_ms);
    }

    fn wants_field(&self) -> bool {
        self.visible || self.active || self.scanning
    }

    fn request_measurement(&mut self) {
        self.epoch += 1;
        self.measure_pending = true;
    }

    /// Per-frame hook. Returns at most one measurement to run.
    pub fn frame_update(&mut self, now_ms: f64) -> Option<MeasureRequest> {
        if self.resize.fire(now_ms) && self.wants_field() {
            self.request_measurement();
        }
        if !self.measure_pending {
            return None;
        }
        self.measure_pending = false;
        Some(MeasureRequest {
            epoch: self.epoch,
            preset: self.preset,
        })
    }

    /// Accept a measurement result. Results for an older epoch are dropped.
    pub fn install_field(&mut self, epoch: u64, field: DepthField) -> bool {
        if epoch != self.epoch {
            log::debug!("[sonify] dropping stale field (epoch {epoch}, now {})", self.epoch);
            return false;
        }
        if self.scanning && self.scan.is_none() {
            let scan = ScanlineAutomator::start(field.bounds, &self.config);
            self.timer.start(scan.tick_interval_ms());
            self.scanline = scan.scanline();
            self.scan = Some(scan);
        }
        self.field = Some(field);
        true
    }

    /// The measurement for `epoch` could not run. Without a depth range the
    /// session cannot sound, so a current failure ends the activation.
    /// Returns true when the session was shut down.
    pub fn measurement_failed(&mut self, epoch: u64, error: SonifyError) -> bool {
        if epoch != self.epoch {
            log::debug!("[sonify] ignoring stale failure (epoch {epoch}): {error}");
            return false;
        }
        log::error!("[sonify] depth measurement failed: {error}");
        if !(self.active || self.scanning) {
            return false;
        }
        self.shut_down();
        true
    }

    fn sample_at(&mut self, x: f32, y: f32) -> Option<SampleParams> {
        let params = self.field.as_ref()?.sample(x, y);
        self.graph.apply(&params);
        Some(params)
    }

    /// Real pointer movement. Only sounds in `Active`.
    pub fn pointer_sample(&mut self, x: f32, y: f32) -> Option<SampleParams> {
        if self.state() != PlaybackState::Active {
            return None;
        }
        self.sample_at(x, y)
    }

    /// Scan timer callback.
    pub fn scan_tick(&mut self) -> Option<SampleParams> {
        let tick = self.scan.as_mut()?.tick();
        if let Some(scan) = &self.scan {
            self.scanline = scan.scanline();
        }
        match tick {
            ScanTick::Sample { x, y, cue } => {
                if cue {
                    self.graph.play_cue();
                }
                self.sample_at(x, y)
            }
            ScanTick::Finished => {
                log::info!("[sonify] scan complete");
                if let Err(e) = self.set_scanning(false) {
                    log::warn!("[sonify] scan shutdown: {e}");
                }
                None
            }
        }
    }
}
