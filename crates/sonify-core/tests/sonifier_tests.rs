// Host-side tests for the session state machine and scan automation.

mod common;

use common::{field_200x100, FakeAudio, FakeTimer};
use sonify_core::graph::Lane;
use sonify_core::{
    CameraPreset, PlaybackState, ProjectedBounds, ScanTick, ScanlineAutomator, Sonifier,
    SonifyConfig, SonifyError, SonifyMode,
};

type TestSonifier = Sonifier<FakeAudio, FakeTimer>;

fn sonifier() -> TestSonifier {
    Sonifier::new(FakeAudio::default(), FakeTimer::default(), SonifyConfig::default())
}

fn install_current(s: &mut TestSonifier, depth: f32) {
    let req = s.frame_update(0.0).expect("measurement requested");
    assert!(s.install_field(req.epoch, field_200x100(depth)));
}

#[test]
fn toggles_are_mutually_exclusive_in_every_order() {
    let ops: [(bool, bool); 4] = [(true, true), (true, false), (false, true), (false, false)];
    // (is_active_toggle, value)
    for first in ops {
        for second in ops {
            for third in ops {
                let mut s = sonifier();
                for (is_active, on) in [first, second, third] {
                    if is_active {
                        s.set_active(on).unwrap();
                    } else {
                        s.set_scanning(on).unwrap();
                    }
                    assert!(!(s.active() && s.scanning()));
                }
            }
        }
    }
}

#[test]
fn enabling_active_forces_scanning_off() {
    let mut s = sonifier();
    s.set_scanning(true).unwrap();
    assert_eq!(s.state(), PlaybackState::Scanning);
    s.set_active(true).unwrap();
    assert!(!s.scanning());
    assert_eq!(s.state(), PlaybackState::Active);
    s.set_scanning(true).unwrap();
    assert!(!s.active());
}

#[test]
fn activation_builds_graph_and_requests_range() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    assert!(s.graph().is_live());
    let req = s.frame_update(0.0).unwrap();
    assert_eq!(req.epoch, s.epoch());
    assert!(s.frame_update(1.0).is_none());
}

#[test]
fn deactivation_returns_to_idle_and_releases_nodes() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    install_current(&mut s, 0.5);
    s.set_active(false).unwrap();
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.graph().is_live());
    assert!(s.graph().output().live_ids.is_empty());
    assert!(s.field().is_none());
}

#[test]
fn failed_activation_stays_idle() {
    let mut s = Sonifier::new(
        FakeAudio {
            fail_resume: true,
            ..FakeAudio::default()
        },
        FakeTimer::default(),
        SonifyConfig::default(),
    );
    assert!(s.set_scanning(true).is_err());
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.scanning() && !s.active());
    assert!(s.frame_update(0.0).is_none());
}

#[test]
fn pointer_at_bounds_center_is_full_gain() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    install_current(&mut s, 0.5);
    let params = s.pointer_sample(200.0, 100.0).unwrap();
    assert_eq!(params.gain, 1.0);
    assert!((params.normalized_depth - 0.5).abs() < 1e-5);
    assert!((params.frequency_hz - 330.0).abs() < 1e-2);
    let (gain, tc) = s.graph().output().gain.unwrap();
    assert_eq!(gain, 1.0);
    assert_eq!(tc, 0.01);
}

#[test]
fn pointer_before_range_is_ready_is_dropped() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    assert!(s.pointer_sample(10.0, 10.0).is_none());
}

#[test]
fn pointer_is_ignored_while_scanning_or_idle() {
    let mut s = sonifier();
    assert!(s.pointer_sample(1.0, 1.0).is_none());
    s.set_scanning(true).unwrap();
    install_current(&mut s, 0.5);
    assert!(s.pointer_sample(1.0, 1.0).is_none());
}

#[test]
fn stale_field_is_discarded() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    let old = s.frame_update(0.0).unwrap();
    s.set_camera_preset(CameraPreset::Left);
    let new = s.frame_update(0.0).unwrap();
    assert!(new.epoch > old.epoch);
    assert_eq!(new.preset, CameraPreset::Left);
    assert!(!s.install_field(old.epoch, field_200x100(0.5)));
    assert!(s.field().is_none());
    assert!(s.install_field(new.epoch, field_200x100(0.5)));
}

#[test]
fn mode_switch_while_active_swaps_lane_once() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    assert!(s.set_mode(SonifyMode::Beep));
    assert!(!s.set_mode(SonifyMode::Beep));
    assert_eq!(s.graph().output().connected, vec![Lane::BeepBuffer]);
    assert!(s.set_mode(SonifyMode::Frequency));
    assert_eq!(s.graph().output().connected, vec![Lane::Oscillator]);
    assert_eq!(s.graph().output().max_connected, 1);
}

#[test]
fn mode_set_while_idle_applies_on_next_start() {
    let mut s = sonifier();
    assert!(s.set_mode(SonifyMode::Beep));
    s.set_active(true).unwrap();
    assert_eq!(s.graph().lane(), Some(Lane::BeepBuffer));
}

#[test]
fn resize_is_debounced() {
    let mut s = sonifier();
    s.set_visible(true);
    s.frame_update(0.0).unwrap();
    s.notify_resize(0.0);
    s.notify_resize(100.0);
    s.notify_resize(150.0);
    assert!(s.frame_update(300.0).is_none());
    assert!(s.frame_update(349.0).is_none());
    assert!(s.frame_update(350.0).is_some());
    assert!(s.frame_update(1000.0).is_none());
}

#[test]
fn resize_while_hidden_and_idle_does_not_measure() {
    let mut s = sonifier();
    s.notify_resize(0.0);
    assert!(s.frame_update(500.0).is_none());
}

#[test]
fn scene_change_requests_only_when_needed() {
    let mut s = sonifier();
    s.scene_changed();
    assert!(s.frame_update(0.0).is_none());
    s.set_visible(true);
    s.frame_update(0.0).unwrap();
    s.scene_changed();
    assert!(s.frame_update(1.0).is_some());
}

#[test]
fn scan_scenario_200px_wide() {
    let bounds = ProjectedBounds {
        min_x: 100.0,
        min_y: 50.0,
        width: 200.0,
        height: 100.0,
    };
    let mut scan = ScanlineAutomator::start(bounds, &SonifyConfig::default());
    assert_eq!(scan.tick_interval_ms(), 10.0);
    for _ in 0..199 {
        scan.tick();
    }
    assert_eq!(scan.state().line_index, 0);
    assert_eq!(scan.state().elapsed_ms, 1990.0);
    scan.tick();
    assert_eq!(scan.state().line_index, 1);
    assert_eq!(scan.state().elapsed_ms, 0.0);
}

#[test]
fn scan_lines_step_five_percent() {
    let bounds = ProjectedBounds {
        min_x: 0.0,
        min_y: 0.0,
        width: 100.0,
        height: 100.0,
    };
    let mut scan = ScanlineAutomator::start(bounds, &SonifyConfig::default());
    let mut last = None;
    for _ in 0..100 {
        last = Some(scan.tick());
    }
    match last.unwrap() {
        ScanTick::Sample { x, y, .. } => {
            assert_eq!(x, 0.0);
            assert!((y - 5.0).abs() < 1e-4);
        }
        ScanTick::Finished => panic!("finished early"),
    }
}

#[test]
fn scan_terminates_for_any_width() {
    for width in [0.5_f32, 1.0, 37.0, 200.0, 999.0] {
        let bounds = ProjectedBounds {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height: 50.0,
        };
        let mut scan = ScanlineAutomator::start(bounds, &SonifyConfig::default());
        let budget = (21.0 * 2000.0 / scan.tick_interval_ms()).ceil() as usize + 1;
        let finished = (0..budget).any(|_| scan.tick() == ScanTick::Finished);
        assert!(finished, "width {width} never finished");
    }
}

#[test]
fn scanning_runs_to_idle_on_its_own() {
    let mut s = sonifier();
    s.set_scanning(true).unwrap();
    install_current(&mut s, 0.5);
    let period = s.timer().running.expect("timer started");
    assert_eq!(period, 10.0);

    let mut ticks = 0usize;
    while s.scanning() {
        s.scan_tick();
        ticks += 1;
        assert!(ticks <= 21 * 200 + 1, "scan did not stop");
    }
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(s.timer().running.is_none());
    assert!(!s.graph().is_live());
    assert_eq!(s.graph().output().cues, 1);
    assert!(s.scan_tick().is_none());
}

#[test]
fn scan_feeds_samples_and_publishes_scanline() {
    let mut s = sonifier();
    s.set_scanning(true).unwrap();
    install_current(&mut s, 0.25);
    let p = s.scan_tick().unwrap();
    assert!((p.frequency_hz - (80.0 + 500.0 * 0.75)).abs() < 1e-2);
    let line = s.scanline();
    assert!((line.x - 101.0).abs() < 1e-3);
    assert_eq!(line.y, 50.0);
}

#[test]
fn stopping_scan_cancels_timer() {
    let mut s = sonifier();
    s.set_scanning(true).unwrap();
    install_current(&mut s, 0.5);
    assert!(s.timer().running.is_some());
    s.set_scanning(false).unwrap();
    assert!(s.timer().running.is_none());
    assert_eq!(s.timer().cancels, 1);
}

#[test]
fn failed_measurement_ends_a_scan() {
    let mut s = sonifier();
    s.set_scanning(true).unwrap();
    let req = s.frame_update(0.0).unwrap();
    assert!(s.measurement_failed(req.epoch, SonifyError::GpuResource("lost".into())));
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.graph().is_live());
    assert!(s.graph().output().connected.is_empty());
    assert!(s.timer().running.is_none());
    for _ in 0..1000 {
        assert!(s.scan_tick().is_none());
        assert!(s.frame_update(0.0).is_none());
    }
}

#[test]
fn missing_gpu_ends_pointer_session() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    let req = s.frame_update(0.0).unwrap();
    let err = SonifyError::SurfaceUnavailable("no device".into());
    assert!(s.measurement_failed(req.epoch, err));
    assert!(!s.active());
    assert!(s.graph().output().live_ids.is_empty());
}

#[test]
fn stale_measurement_failure_is_ignored() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    let old = s.frame_update(0.0).unwrap();
    s.set_camera_preset(CameraPreset::Top);
    let new = s.frame_update(0.0).unwrap();
    assert!(!s.measurement_failed(old.epoch, SonifyError::GpuResource("late".into())));
    assert_eq!(s.state(), PlaybackState::Active);
    assert!(s.install_field(new.epoch, field_200x100(0.5)));
}

#[test]
fn measurement_failure_while_idle_keeps_idle() {
    let mut s = sonifier();
    s.set_visible(true);
    let req = s.frame_update(0.0).unwrap();
    assert!(!s.measurement_failed(req.epoch, SonifyError::GpuResource("x".into())));
    assert_eq!(s.state(), PlaybackState::Idle);
}

#[test]
fn refused_mode_switch_keeps_reported_mode() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    s.graph_mut().output_mut().fail_connect = vec![Lane::BeepBuffer];
    assert!(!s.set_mode(SonifyMode::Beep));
    assert_eq!(s.mode(), SonifyMode::Frequency);
    assert_eq!(s.graph().lane(), Some(Lane::from(s.mode())));
    assert_eq!(s.state(), PlaybackState::Active);
}

#[test]
fn mode_switch_that_loses_every_lane_goes_idle() {
    let mut s = sonifier();
    s.set_active(true).unwrap();
    s.graph_mut().output_mut().fail_connect = vec![Lane::BeepBuffer, Lane::Oscillator];
    assert!(!s.set_mode(SonifyMode::Beep));
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.graph().is_live());
    assert_eq!(s.mode(), SonifyMode::Frequency);
}
