use sonify_core::graph::{AudioOutput, GraphTuning, Lane};
use sonify_core::synth::{beep_buffer, sweep_cue};
use sonify_core::{Result, SonifyError};
use web_sys as web;

/// Nodes of one activation. Gain, limiter and filter are shared by both
/// lanes; the two sources run for the whole activation and only their
/// connection to the gain changes.
pub struct WebGraph {
    oscillator: web::OscillatorNode,
    beep: web::AudioBufferSourceNode,
    gain: web::GainNode,
    limiter: web::DynamicsCompressorNode,
    filter: web::BiquadFilterNode,
}

impl WebGraph {
    fn source(&self, lane: Lane) -> &web::AudioNode {
        match lane {
            Lane::Oscillator => &self.oscillator,
            Lane::BeepBuffer => &self.beep,
        }
    }
}

/// WebAudio backend for the graph controller.
pub struct WebAudioOutput {
    ctx: web::AudioContext,
    cue: Option<web::AudioBuffer>,
}

fn audio_err(what: &str, e: wasm_bindgen::JsValue) -> SonifyError {
    log::error!("{} error: {:?}", what, e);
    SonifyError::AudioUnavailable(format!("{what}: {e:?}"))
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx).map_err(|e| audio_err(label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

fn mono_buffer(audio_ctx: &web::AudioContext, samples: &mut [f32]) -> Result<web::AudioBuffer> {
    let sr = audio_ctx.sample_rate();
    let buf = audio_ctx
        .create_buffer(1, samples.len().max(1) as u32, sr)
        .map_err(|e| audio_err("AudioBuffer", e))?;
    buf.copy_to_channel(samples, 0)
        .map_err(|e| audio_err("copy_to_channel", e))?;
    Ok(buf)
}

impl WebAudioOutput {
    pub fn new(ctx: web::AudioContext) -> Self {
        let mut samples = sweep_cue(ctx.sample_rate());
        let cue = match mono_buffer(&ctx, &mut samples) {
            Ok(b) => Some(b),
            Err(e) => {
                log::warn!("[audio] sweep cue unavailable: {e}");
                None
            }
        };
        Self { ctx, cue }
    }
}

impl AudioOutput for WebAudioOutput {
    type Graph = WebGraph;

    fn resume_if_suspended(&mut self) -> Result<()> {
        match self.ctx.state() {
            web::AudioContextState::Closed => {
                Err(SonifyError::AudioUnavailable("audio context closed".into()))
            }
            web::AudioContextState::Suspended => {
                // The promise settles later; nodes can be wired meanwhile.
                _ = self.ctx.resume().map_err(|e| audio_err("resume", e))?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn build_graph(&mut self, tuning: &GraphTuning) -> Result<WebGraph> {
        let ctx = &self.ctx;

        let filter = web::BiquadFilterNode::new(ctx).map_err(|e| audio_err("BiquadFilterNode", e))?;
        filter.set_type(web::BiquadFilterType::Lowpass);
        filter.frequency().set_value(tuning.filter_frequency_hz);
        filter.q().set_value(tuning.filter_q);

        let limiter = web::DynamicsCompressorNode::new(ctx)
            .map_err(|e| audio_err("DynamicsCompressorNode", e))?;
        limiter.threshold().set_value(tuning.limiter_threshold_db);
        limiter.knee().set_value(tuning.limiter_knee_db);
        limiter.ratio().set_value(tuning.limiter_ratio);
        limiter.attack().set_value(tuning.limiter_attack_sec);
        limiter.release().set_value(tuning.limiter_release_sec);

        let gain = create_gain(ctx, 1.0, "Master")?;

        filter
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| audio_err("connect filter", e))?;
        limiter
            .connect_with_audio_node(&filter)
            .map_err(|e| audio_err("connect limiter", e))?;
        gain.connect_with_audio_node(&limiter)
            .map_err(|e| audio_err("connect gain", e))?;

        let oscillator = web::OscillatorNode::new(ctx).map_err(|e| audio_err("OscillatorNode", e))?;
        oscillator.set_type(web::OscillatorType::Sine);
        oscillator.frequency().set_value(tuning.oscillator_frequency_hz);

        let mut samples = beep_buffer(ctx.sample_rate());
        let buffer = mono_buffer(ctx, &mut samples)?;
        let beep = web::AudioBufferSourceNode::new(ctx)
            .map_err(|e| audio_err("AudioBufferSourceNode", e))?;
        beep.set_buffer(Some(&buffer));
        beep.set_loop(true);
        beep.set_loop_end(tuning.initial_loop_end_sec);

        oscillator.start().map_err(|e| audio_err("oscillator start", e))?;
        beep.start().map_err(|e| audio_err("beep start", e))?;

        log::debug!("[audio] graph built at {} Hz", ctx.sample_rate());
        Ok(WebGraph {
            oscillator,
            beep,
            gain,
            limiter,
            filter,
        })
    }

    fn connect_lane(&mut self, graph: &WebGraph, lane: Lane) -> Result<()> {
        graph
            .source(lane)
            .connect_with_audio_node(&graph.gain)
            .map(|_| ())
            .map_err(|e| audio_err("connect lane", e))
    }

    fn disconnect_lane(&mut self, graph: &WebGraph, lane: Lane) {
        if let Err(e) = graph.source(lane).disconnect_with_audio_node(&graph.gain) {
            log::warn!("[audio] disconnect {:?}: {:?}", lane, e);
        }
    }

    fn set_oscillator_frequency(&mut self, graph: &WebGraph, hz: f32) {
        graph.oscillator.frequency().set_value(hz);
    }

    fn set_loop_end(&mut self, graph: &WebGraph, seconds: f64) {
        graph.beep.set_loop_end(seconds);
    }

    fn set_gain_target(&mut self, graph: &WebGraph, value: f32, time_constant: f64) {
        let now = self.ctx.current_time();
        _ = graph
            .gain
            .gain()
            .set_target_at_time(value, now, time_constant);
    }

    fn teardown(&mut self, graph: WebGraph) {
        _ = graph.oscillator.stop();
        _ = graph.beep.stop();
        _ = graph.gain.disconnect();
        _ = graph.limiter.disconnect();
        _ = graph.filter.disconnect();
    }

    fn play_cue(&mut self) {
        let Some(cue) = &self.cue else {
            return;
        };
        if let Ok(src) = web::AudioBufferSourceNode::new(&self.ctx) {
            src.set_buffer(Some(cue));
            _ = src.connect_with_audio_node(&self.ctx.destination());
            _ = src.start();
        }
    }
}
