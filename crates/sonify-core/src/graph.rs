//! Synthesis graph ownership and source-lane switching.
//!
//! Topology while live:
//!
//! ```text
//! oscillator ─┐
//!             ├─(one lane)─> gain -> limiter -> filter -> destination
//! beep buffer ┘
//! ```
//!
//! Gain, limiter and filter live for the whole activation; only the lane
//! feeding the gain changes on a mode switch.

use crate::constants::*;
use crate::error::Result;
use crate::mapping::{SampleParams, SonifyMode};

/// Source lane feeding the shared gain node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    Oscillator,
    BeepBuffer,
}

impl From<SonifyMode> for Lane {
    fn from(mode: SonifyMode) -> Self {
        match mode {
            SonifyMode::Frequency => Lane::Oscillator,
            SonifyMode::Beep => Lane::BeepBuffer,
        }
    }
}

/// Fixed node settings applied when a graph is built.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphTuning {
    pub filter_frequency_hz: f32,
    pub filter_q: f32,
    pub limiter_threshold_db: f32,
    pub limiter_knee_db: f32,
    pub limiter_ratio: f32,
    pub limiter_attack_sec: f32,
    pub limiter_release_sec: f32,
    pub oscillator_frequency_hz: f32,
    pub initial_loop_end_sec: f64,
    pub gain_smoothing_sec: f64,
}

impl Default for GraphTuning {
    fn default() -> Self {
        Self {
            filter_frequency_hz: FILTER_FREQUENCY_HZ,
            filter_q: FILTER_Q,
            limiter_threshold_db: LIMITER_THRESHOLD_DB,
            limiter_knee_db: LIMITER_KNEE_DB,
            limiter_ratio: LIMITER_RATIO,
            limiter_attack_sec: LIMITER_ATTACK_SEC,
            limiter_release_sec: LIMITER_RELEASE_SEC,
            oscillator_frequency_hz: BASE_FREQUENCY_HZ,
            initial_loop_end_sec: 1.0 / BEEP_BACKGROUND_RATE as f64,
            gain_smoothing_sec: GAIN_SMOOTHING_SEC,
        }
    }
}

/// Audio output capability the controller drives.
///
/// `build_graph` creates and starts both sources and wires
/// gain -> limiter -> filter -> destination, leaving both lanes unconnected.
/// `teardown` stops the sources and detaches the filter from the destination.
pub trait AudioOutput {
    type Graph;

    fn resume_if_suspended(&mut self) -> Result<()>;
    fn build_graph(&mut self, tuning: &GraphTuning) -> Result<Self::Graph>;
    fn connect_lane(&mut self, graph: &Self::Graph, lane: Lane) -> Result<()>;
    fn disconnect_lane(&mut self, graph: &Self::Graph, lane: Lane);
    fn set_oscillator_frequency(&mut self, graph: &Self::Graph, hz: f32);
    fn set_loop_end(&mut self, graph: &Self::Graph, seconds: f64);
    fn set_gain_target(&mut self, graph: &Self::Graph, value: f32, time_constant: f64);
    fn teardown(&mut self, graph: Self::Graph);
    /// One-shot sweep cue, independent of the graph.
    fn play_cue(&mut self);
}

struct LiveGraph<G> {
    nodes: G,
    lane: Lane,
}

/// Owns the single live graph of an activation.
///
/// The graph exists only between `start` and `stop`; every other call is a
/// no-op while idle, so late samples after teardown are dropped.
pub struct AudioGraphController<A: AudioOutput> {
    output: A,
    tuning: GraphTuning,
    live: Option<LiveGraph<A::Graph>>,
}

impl<A: AudioOutput> AudioGraphController<A> {
    pub fn new(output: A, tuning: GraphTuning) -> Self {
        Self {
            output,
            tuning,
            live: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn lane(&self) -> Option<Lane> {
        self.live.as_ref().map(|g| g.lane)
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut A {
        &mut self.output
    }

    /// Build the graph and connect the lane for `mode`. Any previous graph is
    /// torn down first. On failure nothing stays live.
    pub fn start(&mut self, mode: SonifyMode) -> Result<()> {
        self.stop();
        self.output.resume_if_suspended()?;
        let nodes = self.output.build_graph(&self.tuning)?;
        let lane = Lane::from(mode);
        if let Err(e) = self.output.connect_lane(&nodes, lane) {
            self.output.teardown(nodes);
            return Err(e);
        }
        log::info!("[graph] started with {:?} lane", lane);
        self.live = Some(LiveGraph { nodes, lane });
        Ok(())
    }

    /// Disconnect the active lane and release every node.
    pub fn stop(&mut self) {
        if let Some(live) = self.live.take() {
            self.output.disconnect_lane(&live.nodes, live.lane);
            self.output.teardown(live.nodes);
            log::info!("[graph] stopped");
        }
    }

    /// Swap the source lane. Returns `Ok(false)`, without touching the graph,
    /// when idle or when `mode` already drives the output.
    ///
    /// If the new lane cannot be connected the old one is reconnected and the
    /// error returned. If that also fails the graph is stopped, so a live graph
    /// always has exactly one lane.
    pub fn switch_mode(&mut self, mode: SonifyMode) -> Result<bool> {
        let Some(live) = self.live.as_mut() else {
            return Ok(false);
        };
        let incoming = Lane::from(mode);
        if incoming == live.lane {
            return Ok(false);
        }
        self.output
            .set_oscillator_frequency(&live.nodes, self.tuning.oscillator_frequency_hz);
        self.output.disconnect_lane(&live.nodes, live.lane);
        let Err(e) = self.output.connect_lane(&live.nodes, incoming) else {
            live.lane = incoming;
            return Ok(true);
        };
        log::error!("[graph] lane switch failed: {e}; restoring {:?}", live.lane);
        if let Err(restore) = self.output.connect_lane(&live.nodes, live.lane) {
            log::error!("[graph] restoring {:?} failed: {restore}", live.lane);
            if let Some(live) = self.live.take() {
                self.output.teardown(live.nodes);
            }
        }
        Err(e)
    }

    /// Push one sample's parameters to the active lane and the gain.
    pub fn apply(&mut self, params: &SampleParams) {
        let Some(live) = self.live.as_ref() else {
            log::trace!("[graph] sample dropped, no live graph");
            return;
        };
        match live.lane {
            Lane::Oscillator => self
                .output
                .set_oscillator_frequency(&live.nodes, params.frequency_hz),
            Lane::BeepBuffer => self.output.set_loop_end(&live.nodes, params.loop_end_sec),
        }
        self.output
            .set_gain_target(&live.nodes, params.gain, self.tuning.gain_smoothing_sec);
    }

    pub fn play_cue(&mut self) {
        if self.live.is_some() {
            self.output.play_cue();
        }
    }
}

impl<A: AudioOutput> Drop for AudioGraphController<A> {
    fn drop(&mut self) {
        self.stop();
    }
}
