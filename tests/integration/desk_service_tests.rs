//! Integration tests: DeskService → MotionController → relay port.

use desklift::app::events::AppEvent;
use desklift::app::service::DeskService;
use desklift::config::DeskConfig;
use desklift::control::motion::{Direction, MoveOutcome};
use desklift::error::Error;

use crate::mock_hw::{MockClock, MockHw, RecordingSink};

fn service() -> DeskService {
    DeskService::new(DeskConfig::default()).expect("default config must validate")
}

#[test]
fn reports_current_height_without_actuating() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[96.4]);

    let estimate = svc.current_height(&mut hw);

    assert!((estimate.distance_cm - 96.4).abs() < f32::EPSILON);
    assert_eq!(estimate.rounded_cm(), 96);
    assert!(hw.presses.is_empty());
}

#[test]
fn raises_the_desk_to_an_explicit_target() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[80.0, 90.0, 100.0, 109.5]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let result = svc.move_to(110, &mut hw, &clock, &mut sink).unwrap();

    assert_eq!(result.outcome, MoveOutcome::Converged);
    assert_eq!(result.direction, Some(Direction::Up));
    assert_eq!(hw.presses, vec![Direction::Up]);
    assert!(hw.pressed().is_none(), "relays must rest after the move");
    // 109.5 rounds to 110 only at the comparison boundary; the raw value
    // survives in the result.
    assert!((result.final_height_cm - 109.5).abs() < f32::EPSILON);
}

#[test]
fn lowers_the_desk_when_above_target() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[120.0, 110.0, 100.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let result = svc.move_to(100, &mut hw, &clock, &mut sink).unwrap();

    assert_eq!(result.outcome, MoveOutcome::Converged);
    assert_eq!(hw.presses, vec![Direction::Down]);
}

#[test]
fn move_to_reached_target_touches_nothing() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[110.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let result = svc.move_to(110, &mut hw, &clock, &mut sink).unwrap();

    assert_eq!(result.outcome, MoveOutcome::AlreadyInPosition);
    assert!(hw.presses.is_empty());
    assert_eq!(hw.releases, 0, "no relay toggles at all for a no-op move");
}

#[test]
fn second_move_to_same_target_is_idempotent() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[80.0, 100.0, 110.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let first = svc.move_to(110, &mut hw, &clock, &mut sink).unwrap();
    assert_eq!(first.outcome, MoveOutcome::Converged);
    let presses = hw.presses.len();

    let second = svc.move_to(110, &mut hw, &clock, &mut sink).unwrap();
    assert_eq!(second.outcome, MoveOutcome::AlreadyInPosition);
    assert_eq!(hw.presses.len(), presses, "repeat move must not actuate");
}

#[test]
fn stuck_desk_is_bounded_by_the_move_deadline() {
    let config = DeskConfig {
        move_timeout_secs: 1,
        ..DeskConfig::default()
    };
    let mut svc = DeskService::new(config).unwrap();
    // Never reaches 110.
    let mut hw = MockHw::with_heights(&[100.0]);
    let clock = MockClock::stepping(50);
    let mut sink = RecordingSink::default();

    let result = svc.move_to(110, &mut hw, &clock, &mut sink).unwrap();

    assert_eq!(result.outcome, MoveOutcome::TimedOut);
    assert!((result.final_height_cm - 100.0).abs() < f32::EPSILON);
    assert!(hw.pressed().is_none(), "timeout must release the relay");
    assert!(
        result.elapsed_ms <= 1_000 + 200,
        "deadline overshot: {} ms",
        result.elapsed_ms
    );
}

#[test]
fn out_of_range_target_never_reaches_the_hardware() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[100.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    for target in [10, 64, 126, 400] {
        let err = svc.move_to(target, &mut hw, &clock, &mut sink).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { .. }), "target {target}");
    }
    assert_eq!(hw.measure_calls, 0);
    assert!(hw.presses.is_empty());
}

#[test]
fn sit_preset_runs_a_downward_move() {
    let mut svc = service();
    let sit = svc.config().sit_height_cm;
    let mut hw = MockHw::with_heights(&[110.0, 90.0, f32::from(sit)]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let result = svc.apply_preset(1, &mut hw, &clock, &mut sink).unwrap();

    let result = result.expect("preset 1 is mapped");
    assert_eq!(result.outcome, MoveOutcome::Converged);
    assert_eq!(hw.presses, vec![Direction::Down]);
}

#[test]
fn stand_preset_runs_an_upward_move() {
    let mut svc = service();
    let stand = svc.config().stand_height_cm;
    let mut hw = MockHw::with_heights(&[70.0, 100.0, f32::from(stand)]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let result = svc.apply_preset(2, &mut hw, &clock, &mut sink).unwrap();

    assert_eq!(result.unwrap().outcome, MoveOutcome::Converged);
    assert_eq!(hw.presses, vec![Direction::Up]);
}

#[test]
fn unknown_preset_reports_without_moving() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[100.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let result = svc.apply_preset(7, &mut hw, &clock, &mut sink).unwrap();

    assert!(result.is_none());
    assert!(hw.presses.is_empty());
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::PresetUnknown { id: 7 }))
    );
    // The caller can still read the height afterwards.
    assert_eq!(svc.current_height(&mut hw).rounded_cm(), 100);
}

#[test]
fn dead_sensor_move_times_out_and_reports_degradation() {
    let config = DeskConfig {
        move_timeout_secs: 1,
        ..DeskConfig::default()
    };
    let mut svc = DeskService::new(config).unwrap();
    let mut hw = MockHw::with_heights(&[0.0]);
    let clock = MockClock::stepping(100);
    let mut sink = RecordingSink::default();

    let result = svc.move_to(110, &mut hw, &clock, &mut sink).unwrap();

    assert_eq!(result.outcome, MoveOutcome::TimedOut);
    assert!(hw.pressed().is_none());
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::SensorDegraded { .. }))
    );
}

#[test]
fn move_lifecycle_emits_started_then_finished() {
    let mut svc = service();
    let mut hw = MockHw::with_heights(&[100.0, 110.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    svc.move_to(110, &mut hw, &clock, &mut sink).unwrap();

    let started = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::MoveStarted { .. }));
    let finished = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::MoveFinished(_)));
    assert!(started.unwrap() < finished.unwrap());
}
