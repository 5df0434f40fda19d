//! Integration tests: the HTTP wire contract glued to the service, the way
//! the on-device handlers do it (parse → service call → response payload).

use desklift::adapters::http::{MoveResponse, PresetResponse, parse_preset_uri, parse_set_height};
use desklift::app::service::DeskService;
use desklift::config::DeskConfig;
use desklift::error::Error;

use crate::mock_hw::{MockClock, MockHw, RecordingSink};

#[test]
fn post_desk_flow_round_trips_through_the_service() {
    let cmd = parse_set_height(br#"{"height": 110}"#).unwrap();

    let mut svc = DeskService::new(DeskConfig::default()).unwrap();
    let mut hw = MockHw::with_heights(&[100.0, 105.0, 110.2]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let result = svc.move_to(cmd.height, &mut hw, &clock, &mut sink).unwrap();

    let response = MoveResponse {
        desired_height: cmd.height,
        current_height: result.final_height_cm.round() as i32,
        outcome: result.outcome.as_str(),
    };
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(
        json,
        r#"{"desired_height":110,"current_height":110,"outcome":"converged"}"#
    );
}

#[test]
fn post_desk_rejects_out_of_range_targets_as_invalid() {
    let cmd = parse_set_height(br#"{"height": 300}"#).unwrap();

    let mut svc = DeskService::new(DeskConfig::default()).unwrap();
    let mut hw = MockHw::with_heights(&[100.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let err = svc
        .move_to(cmd.height, &mut hw, &clock, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTarget { target_cm: 300, .. }));
    // The handler turns this into a 422 with the display message.
    assert!(err.to_string().contains("outside physical range"));
}

#[test]
fn preset_route_flow_reports_current_height_for_unknown_ids() {
    let id = parse_preset_uri("/desk/preset/9").unwrap();

    let mut svc = DeskService::new(DeskConfig::default()).unwrap();
    let mut hw = MockHw::with_heights(&[98.0]);
    let clock = MockClock::stepping(1);
    let mut sink = RecordingSink::default();

    let moved = svc.apply_preset(id, &mut hw, &clock, &mut sink).unwrap();
    assert!(moved.is_none());

    let response = PresetResponse {
        preset_id: id,
        current_height: svc.current_height(&mut hw).rounded_cm(),
    };
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(json, r#"{"preset_id":9,"current_height":98}"#);
}
