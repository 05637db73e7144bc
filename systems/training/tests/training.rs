use royale_core::{BarracksKind, Owner, SiteId, Structure};
use royale_system_training::Training;
use royale_world::scenario::Scenario;

fn barracks(kind: BarracksKind) -> Structure {
    Structure::Barracks {
        kind,
        turns_until_train: 0,
    }
}

fn ids(values: &[u32]) -> Vec<SiteId> {
    values.iter().copied().map(SiteId::new).collect()
}

#[test]
fn knight_and_giant_are_both_funded() {
    let scenario = Scenario::new()
        .gold(300)
        .queens((200, 500), (1700, 500))
        .site(0, (300, 200), 60, Owner::Friendly, barracks(BarracksKind::Knight))
        .site(1, (300, 800), 60, Owner::Friendly, barracks(BarracksKind::Giant));
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(Training::new().handle(&snapshot), Some(ids(&[0, 1])));
}

#[test]
fn leftover_gold_funds_second_knight_closest_first() {
    let scenario = Scenario::new()
        .gold(300)
        .queens((200, 500), (1700, 500))
        .site(0, (300, 200), 60, Owner::Friendly, barracks(BarracksKind::Knight))
        .site(1, (300, 800), 60, Owner::Friendly, barracks(BarracksKind::Giant))
        .site(2, (900, 500), 60, Owner::Friendly, barracks(BarracksKind::Knight));
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    // 300 - 80 - 80 leaves 140, exactly one giant.
    assert_eq!(Training::new().handle(&snapshot), Some(ids(&[2, 0, 1])));
}

#[test]
fn giants_wait_when_knights_drain_the_purse() {
    let scenario = Scenario::new()
        .gold(200)
        .queens((200, 500), (1700, 500))
        .site(0, (300, 200), 60, Owner::Friendly, barracks(BarracksKind::Knight))
        .site(1, (300, 800), 60, Owner::Friendly, barracks(BarracksKind::Giant))
        .site(2, (900, 500), 60, Owner::Friendly, barracks(BarracksKind::Knight));
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(Training::new().handle(&snapshot), Some(ids(&[2, 0])));
}

#[test]
fn archers_and_enemy_barracks_are_ignored() {
    let scenario = Scenario::new()
        .gold(500)
        .queens((200, 500), (1700, 500))
        .site(0, (300, 200), 60, Owner::Friendly, barracks(BarracksKind::Archer))
        .site(1, (1500, 800), 60, Owner::Enemy, barracks(BarracksKind::Knight));
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(Training::new().handle(&snapshot), None);
}

#[test]
fn empty_purse_trains_nothing() {
    let scenario = Scenario::new()
        .gold(79)
        .queens((200, 500), (1700, 500))
        .site(0, (300, 200), 60, Owner::Friendly, barracks(BarracksKind::Knight));
    let snapshot = scenario.snapshot().expect("scenario snapshot");
    assert_eq!(Training::new().handle(&snapshot), None);
}
