#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Territory expansion: walks the queen toward the most rewarding free site.

use glam::DVec2;
use royale_core::{
    geometry::distance, Owner, QueenAction, Site, StructureKind, UnitKind, ARENA_WIDTH,
    KNIGHT_SPEED, QUEEN_SPEED,
};
use royale_system_build_advisor::advise;
use royale_system_pathing::{Path, PathPlanner};
use royale_world::WorldSnapshot;

/// Priority of the expansion proposal.
pub const PRIORITY: u8 = 0;

/// Sites this close to the enemy's side of the arena are left alone.
const ENEMY_TERRITORY: f64 = 450.0;
/// Sites farther than this from the queen are not considered.
const MAX_SITE_DISTANCE: f64 = 800.0;
/// Follow-up candidates examined when pairing targets.
const FOLLOW_UP_WINDOW: usize = 5;

/// Expansion system choosing the next site to walk to.
#[derive(Clone, Copy, Debug, Default)]
pub struct Expansion;

impl Expansion {
    /// Creates the expansion system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Proposes a movement toward the best site, or nothing when no site
    /// survives the filters.
    ///
    /// Candidates are ranked by distance from the queen minus the advised
    /// bonus. The top candidate is paired with each of the next few follow-up
    /// candidates and the pairing with the lowest planned cost, net of both
    /// bonuses, decides the step.
    #[must_use]
    pub fn handle(&self, snapshot: &WorldSnapshot) -> Option<QueenAction> {
        let queen = snapshot.my_queen().center();
        let touched = snapshot.touched_site().map(Site::id);

        let mut leaders = Vec::new();
        let mut follow_ups = Vec::new();
        for site in snapshot.sites() {
            if Some(site.id()) == touched || !is_contestable(snapshot, site) {
                continue;
            }
            let Some(primary) = advise(snapshot, site, false) else {
                continue;
            };
            leaders.push(Candidate::new(site, primary.bonus, queen));
            if let Some(secondary) = advise(snapshot, site, true) {
                follow_ups.push(Candidate::new(site, secondary.bonus, queen));
            }
        }

        leaders.sort_by(|a, b| a.rank.total_cmp(&b.rank));
        follow_ups.sort_by(|a, b| a.rank.total_cmp(&b.rank));

        let leader = leaders.first()?;
        let planner = PathPlanner::new(snapshot);
        let mut best: Option<(f64, Path)> = None;
        for follow_up in follow_ups.iter().take(FOLLOW_UP_WINDOW).skip(1) {
            if follow_up.site.id() == leader.site.id() {
                continue;
            }
            let path = planner.plan(queen, leader.site, Some(follow_up.site));
            let total = path.cost - leader.bonus - follow_up.bonus;
            if best.map_or(true, |(lowest, _)| total < lowest) {
                best = Some((total, path));
            }
        }

        let path = match best {
            Some((_, path)) => path,
            None => planner.plan(queen, leader.site, None),
        };
        Some(QueenAction::Move {
            target: path.target(),
        })
    }
}

#[derive(Debug)]
struct Candidate<'a> {
    site: &'a Site,
    bonus: f64,
    rank: f64,
}

impl<'a> Candidate<'a> {
    fn new(site: &'a Site, bonus: f64, queen: DVec2) -> Self {
        Self {
            site,
            bonus,
            rank: distance(queen, site.center()) - bonus,
        }
    }
}

/// Rejects sites on the enemy's half, out of reach, under enemy tower fire,
/// or reachable by an enemy knight no later than the queen.
fn is_contestable(snapshot: &WorldSnapshot, site: &Site) -> bool {
    let queen = snapshot.my_queen();
    let to_queen = distance(queen.center(), site.center());
    let enemy_side = ARENA_WIDTH - snapshot.home_corner().x;
    if (site.center().x - enemy_side).abs() <= ENEMY_TERRITORY || to_queen > MAX_SITE_DISTANCE {
        return false;
    }

    let outlasted = snapshot.enemy_queen().health > queen.health;
    let under_fire = snapshot
        .sites()
        .iter()
        .filter(|tower| tower.is(Owner::Enemy, StructureKind::Tower))
        .any(|tower| {
            let margin = if outlasted { tower.radius() } else { 0.0 };
            distance(site.center(), tower.center()) + margin <= tower.structure.tower_range()
        });
    if under_fire {
        return false;
    }

    !snapshot
        .units_of(Owner::Enemy, UnitKind::Knight)
        .any(|knight| {
            distance(knight.center(), site.center()) / KNIGHT_SPEED <= to_queen / QUEEN_SPEED
        })
}
