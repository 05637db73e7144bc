#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Recommends what a site should become, with a desirability bonus.
//!
//! The advisor is shared by the expansion system, which ranks candidate sites
//! by the bonus, and the structures system, which turns the recommendation
//! into a build order once the queen touches the site.

use glam::DVec2;
use royale_core::{
    geometry::distance, BarracksKind, Blueprint, Owner, Site, StructureKind, UnitKind,
    KNIGHT_SPEED, QUEEN_SPEED, TOWER_MAX_HEALTH, TOWER_REPAIR_STEP,
};
use royale_world::{query, WorldSnapshot};

/// Empty sites closer than this to the advised site count as surroundings.
const SURROUNDING_RADIUS: f64 = 400.0;
/// Gap to the enemy queen that makes a new knight barracks worth building.
const BARRACKS_REPLACEMENT_DISTANCE: f64 = 400.0;
/// Missing repair increments after which a tower counts as under-repaired.
const UNDER_REPAIRED_STEPS: f64 = 2.0;

/// Structure recommended for a site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildDecision {
    /// What the site should become.
    pub blueprint: Blueprint,
    /// Desirability bonus expressed in queen travel distance.
    pub bonus: f64,
}

impl BuildDecision {
    /// Creates a recommendation.
    #[must_use]
    pub const fn new(blueprint: Blueprint, bonus: f64) -> Self {
        Self { blueprint, bonus }
    }
}

/// Recommends a structure for `site`.
///
/// `second` marks the site as a follow-up target, which suppresses
/// recommendations that only pay off once the queen is standing on it.
/// Enemy towers are never advised on.
#[must_use]
pub fn advise(snapshot: &WorldSnapshot, site: &Site, second: bool) -> Option<BuildDecision> {
    if site.is(Owner::Enemy, StructureKind::Tower) {
        return None;
    }

    let census = Census::take(snapshot, site);
    let my_queen = snapshot.my_queen().center();
    let enemy_queen = snapshot.enemy_queen().center();
    let to_enemy_queen = distance(enemy_queen, site.center());
    let proximity = (distance(snapshot.home_corner(), enemy_queen) - to_enemy_queen) / 2.0;
    let comfort = query::comfort_tower_count(snapshot);
    let interception = Interception::toward(snapshot, site.center());
    let knight_bonus = interception.bonus();

    let giant_affordable = census.knight_barracks > 0
        && census.giant_barracks == 0
        && snapshot.gold() > BarracksKind::Giant.unit_cost() + BarracksKind::Knight.unit_cost() / 2
        && !second;
    let useless_tower = is_useless_tower(snapshot, site, &census, &interception);
    let barracks_drifted = census
        .my_front_barracks
        .map_or(false, |(_, gap)| gap - to_enemy_queen >= BARRACKS_REPLACEMENT_DISTANCE);

    match site.structure.kind() {
        StructureKind::Mine => {
            let threat = census
                .enemy_front_barracks
                .map(Site::center)
                .or(interception.knight)
                .unwrap_or(DVec2::ZERO);
            let guarded = query::towers_on_path(snapshot, my_queen, threat, None);
            if interception.knight.is_some() && guarded < comfort {
                let income = f64::from(site.structure.income_rate());
                return Some(BuildDecision::new(
                    Blueprint::Tower,
                    -(income + 1.0) * 2.0 * QUEEN_SPEED
                        + census.empty_surroundings as f64 * QUEEN_SPEED
                        + knight_bonus,
                ));
            }
            if giant_affordable {
                return Some(BuildDecision::new(
                    Blueprint::Barracks(BarracksKind::Giant),
                    proximity + knight_bonus,
                ));
            }
        }
        StructureKind::Tower => {
            let missing = f64::from(TOWER_MAX_HEALTH.saturating_sub(site.structure.tower_health()))
                / f64::from(TOWER_REPAIR_STEP);
            if missing > UNDER_REPAIRED_STEPS && !useless_tower {
                return Some(BuildDecision::new(Blueprint::Tower, -QUEEN_SPEED + knight_bonus));
            }
        }
        StructureKind::Empty | StructureKind::Barracks => {}
    }

    let useless_barracks = site.structure.barracks() == Some(BarracksKind::Knight)
        && census.knight_barracks > 1
        && census
            .my_front_barracks
            .map_or(false, |(front, _)| front.id() != site.id());
    let rebuildable = site.structure.kind() == StructureKind::Empty
        || useless_barracks
        || useless_tower;
    if !rebuildable {
        return None;
    }

    let surroundings = census.empty_surroundings as f64;
    let knights = Blueprint::Barracks(BarracksKind::Knight);
    let decision = if census.knight_barracks == 0
        && (census.my_mines >= 2 || census.enemy_knight_barracks != 0)
        && !second
    {
        BuildDecision::new(knights, proximity + knight_bonus)
    } else if census.knight_barracks > 0 && census.my_mines >= 2 && census.my_towers == 0 && !second
    {
        BuildDecision::new(Blueprint::Tower, surroundings * QUEEN_SPEED + knight_bonus)
    } else if census.knight_barracks > 0 && barracks_drifted {
        BuildDecision::new(knights, knight_bonus)
    } else if (census.enemy_knight_barracks > 0 || interception.knight.is_some())
        && census.enemy_front_barracks.map_or(false, |front| {
            query::towers_on_path(snapshot, my_queen, front.center(), None) < comfort
        })
    {
        BuildDecision::new(Blueprint::Tower, surroundings * QUEEN_SPEED + knight_bonus)
    } else if query::is_under_threat(snapshot) {
        BuildDecision::new(Blueprint::Tower, knight_bonus)
    } else if giant_affordable {
        BuildDecision::new(Blueprint::Barracks(BarracksKind::Giant), proximity + knight_bonus)
    } else if census.knight_barracks > 0 && barracks_drifted {
        BuildDecision::new(knights, proximity + knight_bonus)
    } else if site.gold_or_one() > 0 {
        let depth = f64::from(site.max_mine_size.unwrap_or(1).max(1)) - 1.0;
        BuildDecision::new(Blueprint::Mine, depth * QUEEN_SPEED + knight_bonus)
    } else {
        BuildDecision::new(Blueprint::Tower, surroundings + knight_bonus)
    };
    Some(decision)
}

/// A tower whose removal would still leave the approach to the nearest enemy
/// barracks covered well enough.
fn is_useless_tower(
    snapshot: &WorldSnapshot,
    site: &Site,
    census: &Census<'_>,
    interception: &Interception,
) -> bool {
    if site.structure.kind() != StructureKind::Tower || interception.knight.is_some() {
        return false;
    }
    let Some(front) = census.enemy_front_barracks else {
        return false;
    };
    let comfort = query::comfort_tower_count(snapshot);
    let ignore = Some(site.id());
    query::towers_on_path(snapshot, snapshot.my_queen().center(), front.center(), ignore) >= comfort
        && query::towers_on_path(snapshot, site.center(), front.center(), ignore) >= comfort
        && site.gold_or_one() > 0
}

/// Counts of the structures that steer the cascade.
#[derive(Debug, Default)]
struct Census<'a> {
    knight_barracks: usize,
    giant_barracks: usize,
    enemy_knight_barracks: usize,
    my_mines: usize,
    my_towers: usize,
    empty_surroundings: usize,
    /// Own knight barracks closest to the enemy queen, with that distance.
    my_front_barracks: Option<(&'a Site, f64)>,
    /// Enemy knight barracks closest to the own queen.
    enemy_front_barracks: Option<&'a Site>,
}

impl<'a> Census<'a> {
    fn take(snapshot: &'a WorldSnapshot, target: &Site) -> Self {
        let my_queen = snapshot.my_queen().center();
        let enemy_queen = snapshot.enemy_queen().center();
        let mut census = Self::default();
        let mut enemy_front_gap = f64::INFINITY;

        for site in snapshot.sites() {
            if site.is_barracks(Owner::Friendly, BarracksKind::Knight) {
                census.knight_barracks += 1;
                let gap = distance(enemy_queen, site.center());
                if census.my_front_barracks.map_or(true, |(_, best)| gap < best) {
                    census.my_front_barracks = Some((site, gap));
                }
            } else if site.is_barracks(Owner::Enemy, BarracksKind::Knight) {
                census.enemy_knight_barracks += 1;
                let gap = distance(my_queen, site.center());
                if gap < enemy_front_gap {
                    enemy_front_gap = gap;
                    census.enemy_front_barracks = Some(site);
                }
            } else if site.is_barracks(Owner::Friendly, BarracksKind::Giant) {
                census.giant_barracks += 1;
            } else if site.is(Owner::Friendly, StructureKind::Mine) {
                census.my_mines += 1;
            } else if site.is(Owner::Friendly, StructureKind::Tower) {
                census.my_towers += 1;
            } else if site.structure.kind() == StructureKind::Empty
                && distance(site.center(), target.center()) < SURROUNDING_RADIUS
            {
                census.empty_surroundings += 1;
            }
        }
        census
    }
}

/// Closest enemy knight to a site, measured in queen travel.
#[derive(Debug)]
struct Interception {
    knight: Option<DVec2>,
    travel: f64,
}

impl Interception {
    fn toward(snapshot: &WorldSnapshot, point: DVec2) -> Self {
        let mut closest = Self {
            knight: None,
            travel: 0.0,
        };
        for knight in snapshot.units_of(Owner::Enemy, UnitKind::Knight) {
            let travel = distance(knight.center(), point) / KNIGHT_SPEED * QUEEN_SPEED;
            if closest.knight.is_none() || travel < closest.travel {
                closest = Self {
                    knight: Some(knight.center()),
                    travel,
                };
            }
        }
        closest
    }

    /// Extra priority granted by the knight's travel time, zero without knights.
    fn bonus(&self) -> f64 {
        self.travel
    }
}
