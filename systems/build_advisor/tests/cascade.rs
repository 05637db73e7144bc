use glam::DVec2;
use royale_core::{BarracksKind, Blueprint, Owner, SiteId, Structure, UnitKind};
use royale_system_build_advisor::advise;
use royale_world::{scenario::Scenario, WorldSnapshot};

const TOLERANCE: f64 = 1e-6;

/// Half the gain in closeness to the enemy queen compared with the home corner.
fn proximity(enemy_queen: (f64, f64), site: (f64, f64)) -> f64 {
    let enemy_queen = DVec2::new(enemy_queen.0, enemy_queen.1);
    (DVec2::ZERO.distance(enemy_queen) - enemy_queen.distance(DVec2::new(site.0, site.1))) / 2.0
}

fn knight_barracks(turns_until_train: u32) -> Structure {
    Structure::Barracks {
        kind: BarracksKind::Knight,
        turns_until_train,
    }
}

fn tower(health: u32, attack_radius: u32) -> Structure {
    Structure::Tower {
        health,
        attack_radius,
    }
}

fn decide(scenario: &Scenario, id: u32, second: bool) -> Option<(Blueprint, f64)> {
    let snapshot: WorldSnapshot = scenario.snapshot().expect("scenario snapshot");
    let site = snapshot.site(SiteId::new(id)).expect("site exists");
    advise(&snapshot, site, second).map(|decision| (decision.blueprint, decision.bonus))
}

#[test]
fn lone_site_with_gold_becomes_mine() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 500))
        .empty_site(0, (400, 500), 50)
        .resources(Some(250), Some(3));
    let (blueprint, bonus) = decide(&scenario, 0, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Mine);
    assert!((bonus - 120.0).abs() < TOLERANCE);
}

#[test]
fn enemy_tower_is_never_advised() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 500))
        .site(0, (400, 500), 50, Owner::Enemy, tower(700, 300));
    assert_eq!(decide(&scenario, 0, false), None);
}

#[test]
fn two_mines_call_for_first_knight_barracks() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 500))
        .site(0, (200, 200), 60, Owner::Friendly, Structure::Mine { income_rate: 1 })
        .site(1, (200, 800), 60, Owner::Friendly, Structure::Mine { income_rate: 1 })
        .empty_site(2, (500, 500), 60);
    let (blueprint, bonus) = decide(&scenario, 2, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Barracks(BarracksKind::Knight));
    assert!((bonus - proximity((1700.0, 500.0), (500.0, 500.0))).abs() < TOLERANCE);

    let (follow_up, _) = decide(&scenario, 2, true).expect("advice");
    assert_eq!(follow_up, Blueprint::Mine, "follow-up targets never get barracks");
}

#[test]
fn unguarded_mine_near_knight_becomes_tower() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 500))
        .site(0, (400, 500), 60, Owner::Friendly, Structure::Mine { income_rate: 2 })
        .unit(Owner::Enemy, UnitKind::Knight, 900, 500);
    let (blueprint, bonus) = decide(&scenario, 0, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Tower);
    // -(2 + 1) * 2 * 60 plus the knight's 500 units scaled to queen pace.
    assert!((bonus - (-360.0 + 300.0)).abs() < TOLERANCE);
}

#[test]
fn damaged_tower_is_repaired() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 500))
        .site(0, (400, 500), 60, Owner::Friendly, tower(300, 250));
    let (blueprint, bonus) = decide(&scenario, 0, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Tower);
    assert!((bonus + 60.0).abs() < TOLERANCE);
}

#[test]
fn healthy_tower_needs_nothing() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 500))
        .site(0, (400, 500), 60, Owner::Friendly, tower(700, 250));
    assert_eq!(decide(&scenario, 0, false), None);
}

#[test]
fn redundant_tower_is_rebuilt_as_barracks() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 800))
        .site(0, (300, 500), 60, Owner::Friendly, tower(700, 300))
        .site(1, (600, 300), 60, Owner::Friendly, tower(800, 400))
        .site(2, (600, 700), 60, Owner::Friendly, tower(800, 400))
        .site(3, (1000, 500), 60, Owner::Enemy, knight_barracks(0));
    let (blueprint, bonus) = decide(&scenario, 0, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Barracks(BarracksKind::Knight));
    assert!((bonus - proximity((1700.0, 800.0), (300.0, 500.0))).abs() < TOLERANCE);
}

#[test]
fn giant_barracks_needs_more_than_giant_and_half_knight() {
    let base = Scenario::new()
        .queens((200, 500), (1700, 500))
        .site(0, (800, 500), 60, Owner::Friendly, knight_barracks(0))
        .empty_site(1, (600, 500), 60);

    let rich = base.clone().gold(200);
    let (blueprint, bonus) = decide(&rich, 1, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Barracks(BarracksKind::Giant));
    assert!((bonus - proximity((1700.0, 500.0), (600.0, 500.0))).abs() < TOLERANCE);

    let exact = base.gold(180);
    let (blueprint, _) = decide(&exact, 1, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Mine);
}

#[test]
fn drifted_barracks_is_replaced_closer_to_enemy() {
    let scenario = Scenario::new()
        .queens((200, 500), (1700, 500))
        .site(0, (200, 200), 60, Owner::Friendly, knight_barracks(0))
        .empty_site(1, (1200, 500), 60);
    let (blueprint, bonus) = decide(&scenario, 1, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Barracks(BarracksKind::Knight));
    assert!(bonus.abs() < TOLERANCE);
}

#[test]
fn rear_knight_barracks_is_reused() {
    let scenario = Scenario::new()
        .queens((250, 600), (1700, 500))
        .site(0, (1000, 500), 60, Owner::Friendly, knight_barracks(0))
        .site(1, (300, 500), 60, Owner::Friendly, knight_barracks(0));
    let (blueprint, _) = decide(&scenario, 1, false).expect("rear barracks is redundant");
    assert_eq!(blueprint, Blueprint::Mine);
    assert_eq!(decide(&scenario, 0, false), None, "front barracks stays");
}

#[test]
fn threatened_queen_prefers_tower() {
    let scenario = Scenario::new()
        .queens((500, 500), (1700, 500))
        .empty_site(0, (500, 700), 50)
        .unit(Owner::Enemy, UnitKind::Knight, 700, 500);
    let (blueprint, bonus) = decide(&scenario, 0, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Tower);
    let expected = (200.0_f64 * 200.0 * 2.0).sqrt() / 100.0 * 60.0;
    assert!((bonus - expected).abs() < TOLERANCE);
}

#[test]
fn undefended_path_to_enemy_barracks_gets_tower() {
    let scenario = Scenario::new()
        .queens((400, 500), (1700, 500))
        .site(0, (800, 500), 60, Owner::Friendly, knight_barracks(0))
        .site(1, (1500, 500), 60, Owner::Enemy, knight_barracks(0))
        .empty_site(2, (500, 300), 60)
        .empty_site(3, (600, 200), 60);
    let (blueprint, bonus) = decide(&scenario, 2, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Tower);
    assert!((bonus - 120.0).abs() < TOLERANCE);
}

#[test]
fn mines_without_towers_get_defense() {
    let scenario = Scenario::new()
        .queens((300, 500), (1700, 500))
        .site(0, (800, 500), 60, Owner::Friendly, knight_barracks(0))
        .site(1, (200, 200), 60, Owner::Friendly, Structure::Mine { income_rate: 1 })
        .site(2, (200, 800), 60, Owner::Friendly, Structure::Mine { income_rate: 1 })
        .empty_site(3, (500, 500), 60);
    let (blueprint, bonus) = decide(&scenario, 3, false).expect("advice");
    assert_eq!(blueprint, Blueprint::Tower);
    assert!((bonus - 60.0).abs() < TOLERANCE);
}
