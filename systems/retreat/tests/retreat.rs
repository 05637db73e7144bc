use glam::{DVec2, IVec2};
use royale_core::{
    geometry::distance, BarracksKind, Owner, QueenAction, SiteId, Structure, UnitKind,
};
use royale_system_pathing::PathPlanner;
use royale_system_retreat::Retreat;
use royale_world::scenario::Scenario;

fn tower(attack_radius: u32) -> Structure {
    Structure::Tower {
        health: 800,
        attack_radius,
    }
}

fn target(action: Option<QueenAction>) -> IVec2 {
    action
        .and_then(|action| action.target())
        .expect("retreat proposes a move")
}

#[test]
fn calm_queen_stays_put() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .site(0, (300, 500), 50, Owner::Friendly, tower(300))
        .unit(Owner::Enemy, UnitKind::Knight, 900, 500);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(Retreat::new().handle(&snapshot), None);
}

#[test]
fn queen_hides_behind_tower_away_from_knights() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .site(0, (300, 500), 50, Owner::Friendly, tower(300))
        .unit(Owner::Enemy, UnitKind::Knight, 700, 600);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(
        target(Retreat::new().handle(&snapshot)),
        IVec2::new(300, 420)
    );
}

#[test]
fn covered_empty_site_can_be_the_shelter() {
    let scenario = Scenario::new()
        .queens((800, 500), (1700, 500))
        .site(0, (300, 500), 50, Owner::Friendly, tower(200))
        .site(1, (600, 800), 50, Owner::Friendly, tower(200))
        .empty_site(2, (250, 600), 50)
        .site(
            3,
            (1500, 500),
            60,
            Owner::Enemy,
            Structure::Barracks {
                kind: BarracksKind::Knight,
                turns_until_train: 0,
            },
        )
        .unit(Owner::Enemy, UnitKind::Knight, 900, 500);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    let step = target(Retreat::new().handle(&snapshot)).as_dvec2();
    let shelter = DVec2::new(250.0, 600.0);
    assert!((distance(step, shelter) - 80.0).abs() <= 1.0, "step {step:?}");
}

#[test]
fn no_shelter_means_no_retreat() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .empty_site(0, (300, 500), 50)
        .unit(Owner::Enemy, UnitKind::Knight, 700, 500);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(Retreat::new().handle(&snapshot), None);
}

#[test]
fn blocked_shelter_is_reached_around_the_obstacle() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .site(0, (100, 500), 50, Owner::Friendly, tower(100))
        .empty_site(1, (300, 500), 60)
        .unit(Owner::Enemy, UnitKind::Knight, 600, 650);
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    let shelter = snapshot.site(SiteId::new(0)).expect("shelter");
    let path = PathPlanner::new(&snapshot).plan(snapshot.my_queen().center(), shelter, None);
    assert!(path.detour);
    assert_eq!(target(Retreat::new().handle(&snapshot)), path.target());
}
