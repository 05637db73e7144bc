use glam::IVec2;
use royale_core::{
    geometry::{distance, in_arena},
    Owner, UnitKind, QUEEN_SPEED,
};
use royale_system_give_way::{in_charge_lane, GiveWay};
use royale_world::scenario::Scenario;

#[test]
fn clear_lane_keeps_the_chosen_move() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .unit(Owner::Friendly, UnitKind::Knight, 300, 800);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(GiveWay::new().handle(&snapshot, IVec2::new(700, 500)), None);
}

#[test]
fn standing_still_needs_no_correction() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .unit(Owner::Friendly, UnitKind::Knight, 520, 500);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(GiveWay::new().handle(&snapshot, IVec2::new(500, 500)), None);
}

#[test]
fn blocked_step_is_moved_out_of_the_lane() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .unit(Owner::Friendly, UnitKind::Knight, 520, 500);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    let queen = IVec2::new(500, 500);
    let enemy_queen = IVec2::new(1700, 500);
    let knight = IVec2::new(520, 500);
    assert!(in_charge_lane(knight, enemy_queen, IVec2::new(560, 500).as_dvec2()));

    let step = GiveWay::new()
        .handle(&snapshot, IVec2::new(700, 500))
        .and_then(|action| action.target())
        .expect("substitute step");
    let step = step.as_dvec2();
    assert!(distance(queen.as_dvec2(), step) <= QUEEN_SPEED);
    assert!(in_arena(step));
    assert!(!in_charge_lane(knight, enemy_queen, step));
}

#[test]
fn distant_target_is_scaled_to_one_turn() {
    // The preferred step is exactly one queen stride even for far targets, so
    // a knight sitting on that stride forces a correction.
    let scenario = Scenario::new()
        .queens((100, 100), (1800, 900))
        .unit(Owner::Friendly, UnitKind::Knight, 136, 148);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    let action = GiveWay::new().handle(&snapshot, IVec2::new(1000, 1300));
    assert!(action.is_some());
}
