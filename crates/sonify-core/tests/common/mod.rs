// Recording fakes for the audio and timer capabilities.

#![allow(dead_code)]
use sonify_core::graph::{AudioOutput, GraphTuning, Lane};
use sonify_core::{DepthField, DepthImage, DepthRange, Result, ScanTimer, SonifyError};
use sonify_core::{Aabb, Camera, CameraPreset, Projection};
use glam::Vec3;

#[derive(Debug, Default)]
pub struct FakeNodes {
    pub id: u32,
}

#[derive(Debug, Default)]
pub struct FakeAudio {
    pub fail_build: bool,
    pub fail_resume: bool,
    pub fail_connect: Vec<Lane>,
    pub built: u32,
    pub torn_down: u32,
    pub resumed: u32,
    pub connected: Vec<Lane>,
    pub max_connected: usize,
    pub frequency: Option<f32>,
    pub loop_end: Option<f64>,
    pub gain: Option<(f32, f64)>,
    pub cues: u32,
    pub live_ids: Vec<u32>,
}

impl FakeAudio {
    pub fn connection_count(&self) -> usize {
        self.connected.len()
    }
}

impl AudioOutput for FakeAudio {
    type Graph = FakeNodes;

    fn resume_if_suspended(&mut self) -> Result<()> {
        if self.fail_resume {
            return Err(SonifyError::AudioUnavailable("suspended".into()));
        }
        self.resumed += 1;
        Ok(())
    }

    fn build_graph(&mut self, tuning: &GraphTuning) -> Result<FakeNodes> {
        if self.fail_build {
            return Err(SonifyError::AudioUnavailable("no context".into()));
        }
        self.built += 1;
        self.frequency = Some(tuning.oscillator_frequency_hz);
        self.loop_end = Some(tuning.initial_loop_end_sec);
        self.live_ids.push(self.built);
        Ok(FakeNodes { id: self.built })
    }

    fn connect_lane(&mut self, graph: &FakeNodes, lane: Lane) -> Result<()> {
        assert!(self.live_ids.contains(&graph.id), "connect on dead graph");
        if self.fail_connect.contains(&lane) {
            return Err(SonifyError::AudioUnavailable(format!("{lane:?} refused")));
        }
        self.connected.push(lane);
        self.max_connected = self.max_connected.max(self.connected.len());
        Ok(())
    }

    fn disconnect_lane(&mut self, graph: &FakeNodes, lane: Lane) {
        assert!(self.live_ids.contains(&graph.id), "disconnect on dead graph");
        let pos = self
            .connected
            .iter()
            .position(|l| *l == lane)
            .expect("disconnecting a lane that is not connected");
        self.connected.remove(pos);
    }

    fn set_oscillator_frequency(&mut self, _graph: &FakeNodes, hz: f32) {
        self.frequency = Some(hz);
    }

    fn set_loop_end(&mut self, _graph: &FakeNodes, seconds: f64) {
        self.loop_end = Some(seconds);
    }

    fn set_gain_target(&mut self, _graph: &FakeNodes, value: f32, time_constant: f64) {
        self.gain = Some((value, time_constant));
    }

    fn teardown(&mut self, graph: FakeNodes) {
        self.live_ids.retain(|id| *id != graph.id);
        self.torn_down += 1;
    }

    fn play_cue(&mut self) {
        self.cues += 1;
    }
}

#[derive(Debug, Default)]
pub struct FakeTimer {
    pub running: Option<f64>,
    pub starts: u32,
    pub cancels: u32,
}

impl ScanTimer for FakeTimer {
    fn start(&mut self, period_ms: f64) {
        assert!(self.running.is_none(), "timer started twice");
        self.running = Some(period_ms);
        self.starts += 1;
    }

    fn cancel(&mut self) {
        self.running = None;
        self.cancels += 1;
    }
}

pub fn front_camera(aspect: f32) -> Camera {
    Camera {
        eye: Vec3::new(0.0, 0.0, 5.0),
        target: Vec3::ZERO,
        up: Vec3::Y,
        aspect,
        projection: Projection::Perspective {
            fovy_radians: std::f32::consts::FRAC_PI_4,
        },
        znear: 0.1,
        zfar: 100.0,
    }
}

pub fn unit_box() -> Aabb {
    Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
}

/// A 400x200 field with hand-placed bounds of 200x100 px at (100, 50).
pub fn field_200x100(depth: f32) -> DepthField {
    let (w, h) = (400u32, 200u32);
    let depths = vec![depth; (w * h) as usize];
    let image = DepthImage::from_depths(w, h, &depths);
    let mut field = DepthField::new(
        image,
        DepthRange::new(0.0, 1.0),
        &front_camera(2.0),
        &unit_box(),
        CameraPreset::Front,
    );
    field.bounds = sonify_core::ProjectedBounds {
        min_x: 100.0,
        min_y: 50.0,
        width: 200.0,
        height: 100.0,
    };
    field.gain_reference =
        sonify_core::proximity::gain_reference_distance(field.viewport(), &field.bounds);
    field
}
