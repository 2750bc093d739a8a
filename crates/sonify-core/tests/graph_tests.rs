// Host-side tests for the audio graph controller and parameter mapping.

mod common;

use common::FakeAudio;
use sonify_core::graph::{AudioGraphController, GraphTuning, Lane};
use sonify_core::mapping::{beep_rate, loop_end, oscillator_frequency};
use sonify_core::{SampleParams, SonifyError, SonifyMode};

fn controller() -> AudioGraphController<FakeAudio> {
    AudioGraphController::new(FakeAudio::default(), GraphTuning::default())
}

#[test]
fn half_depth_maps_to_330_hz() {
    assert!((oscillator_frequency(0.5) - 330.0).abs() < 1e-4);
}

#[test]
fn background_hums_at_80_hz() {
    assert_eq!(oscillator_frequency(0.0), 80.0);
    assert_eq!(oscillator_frequency(1e-7), 80.0);
    assert!((oscillator_frequency(1.0) - 80.0).abs() < 1e-4);
}

#[test]
fn closer_is_higher() {
    assert!(oscillator_frequency(0.1) > oscillator_frequency(0.9));
    assert!(beep_rate(0.1) > beep_rate(0.9));
}

#[test]
fn beep_loop_end_is_reciprocal_rate() {
    let rate = (60.0 + 640.0 * 0.75) / 60.0;
    assert!((beep_rate(0.25) - rate).abs() < 1e-5);
    assert!((loop_end(0.25) - 1.0 / rate as f64).abs() < 1e-6);
    assert_eq!(loop_end(0.0), 1.0);
}

#[test]
fn mode_parses_from_u8() {
    assert_eq!(SonifyMode::try_from(1), Ok(SonifyMode::Beep));
    assert_eq!(SonifyMode::try_from(9), Err(SonifyError::InvalidMode(9)));
}

#[test]
fn start_connects_the_mode_lane() {
    let mut c = controller();
    c.start(SonifyMode::Beep).unwrap();
    assert_eq!(c.output().connected, vec![Lane::BeepBuffer]);
    assert_eq!(c.output().resumed, 1);
    assert_eq!(c.lane(), Some(Lane::BeepBuffer));
}

#[test]
fn mode_round_trip_keeps_exactly_one_lane() {
    let mut c = controller();
    c.start(SonifyMode::Frequency).unwrap();
    assert_eq!(c.switch_mode(SonifyMode::Beep), Ok(true));
    assert_eq!(c.output().connection_count(), 1);
    assert_eq!(c.output().connected, vec![Lane::BeepBuffer]);
    assert_eq!(c.switch_mode(SonifyMode::Frequency), Ok(true));
    assert_eq!(c.output().connected, vec![Lane::Oscillator]);
    assert_eq!(c.output().max_connected, 1);
    // shared chain survives both switches
    assert_eq!(c.output().built, 1);
    assert_eq!(c.output().torn_down, 0);
}

#[test]
fn switching_resets_oscillator_pitch() {
    let mut c = controller();
    c.start(SonifyMode::Frequency).unwrap();
    c.apply(&SampleParams::new(0.5, 1.0));
    assert_eq!(c.output().frequency, Some(330.0));
    c.switch_mode(SonifyMode::Beep).unwrap();
    assert_eq!(c.output().frequency, Some(80.0));
}

#[test]
fn same_mode_switch_is_rejected() {
    let mut c = controller();
    c.start(SonifyMode::Frequency).unwrap();
    assert_eq!(c.switch_mode(SonifyMode::Frequency), Ok(false));
    assert_eq!(c.output().connected, vec![Lane::Oscillator]);
}

#[test]
fn apply_drives_only_the_active_lane() {
    let mut c = controller();
    c.start(SonifyMode::Beep).unwrap();
    c.apply(&SampleParams::new(0.25, 0.5));
    assert_eq!(c.output().frequency, Some(80.0));
    assert!((c.output().loop_end.unwrap() - loop_end(0.25)).abs() < 1e-9);
    assert_eq!(c.output().gain, Some((0.5, 0.01)));
}

#[test]
fn stop_releases_everything() {
    let mut c = controller();
    c.start(SonifyMode::Frequency).unwrap();
    c.stop();
    assert!(!c.is_live());
    assert!(c.output().connected.is_empty());
    assert!(c.output().live_ids.is_empty());
    assert_eq!(c.output().torn_down, 1);
}

#[test]
fn samples_after_stop_are_dropped() {
    let mut c = controller();
    c.start(SonifyMode::Frequency).unwrap();
    c.stop();
    c.apply(&SampleParams::new(0.5, 1.0));
    assert_eq!(c.output().frequency, Some(80.0));
    assert_eq!(c.switch_mode(SonifyMode::Beep), Ok(false));
    c.play_cue();
    assert_eq!(c.output().cues, 0);
}

#[test]
fn build_failure_leaves_nothing_live() {
    let mut c = AudioGraphController::new(
        FakeAudio {
            fail_build: true,
            ..FakeAudio::default()
        },
        GraphTuning::default(),
    );
    assert!(matches!(
        c.start(SonifyMode::Frequency),
        Err(SonifyError::AudioUnavailable(_))
    ));
    assert!(!c.is_live());
}

#[test]
fn refused_lane_switch_keeps_the_old_lane() {
    let mut c = controller();
    c.start(SonifyMode::Frequency).unwrap();
    c.output_mut().fail_connect = vec![Lane::BeepBuffer];
    assert!(c.switch_mode(SonifyMode::Beep).is_err());
    assert_eq!(c.lane(), Some(Lane::Oscillator));
    assert_eq!(c.output().connected, vec![Lane::Oscillator]);
}

#[test]
fn failed_restore_stops_the_graph() {
    let mut c = controller();
    c.start(SonifyMode::Frequency).unwrap();
    c.output_mut().fail_connect = vec![Lane::BeepBuffer, Lane::Oscillator];
    assert!(c.switch_mode(SonifyMode::Beep).is_err());
    assert!(!c.is_live());
    assert!(c.output().connected.is_empty());
    assert!(c.output().live_ids.is_empty());
}
