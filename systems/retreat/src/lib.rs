#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Emergency retreat toward tower cover when enemy knights close in.

use glam::DVec2;
use royale_core::{
    geometry::distance, BarracksKind, Owner, QueenAction, Site, StructureKind, QUEEN_RADIUS,
};
use royale_system_pathing::PathPlanner;
use royale_world::{query, WorldSnapshot};

/// Priority of a retreat proposal.
pub const PRIORITY: u8 = 2;

/// Retreat system steering the queen behind her own towers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Retreat;

impl Retreat {
    /// Creates the retreat system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Proposes an escape step while any enemy knight is inside the danger
    /// radius.
    ///
    /// The shelter is the own tower, or empty site covered by one, farthest
    /// from where the enemy knights come from. The queen heads to the side of
    /// the shelter facing away from the threatening knights.
    #[must_use]
    pub fn handle(&self, snapshot: &WorldSnapshot) -> Option<QueenAction> {
        let (count, sum) = query::threatening_knights(snapshot)
            .fold((0_u32, DVec2::ZERO), |(count, sum), knight| {
                (count + 1, sum + knight.center())
            });
        if count == 0 {
            return None;
        }
        let centroid = sum / f64::from(count);

        let queen = snapshot.my_queen().center();
        let origin = query::closest_barracks(snapshot, Owner::Enemy, BarracksKind::Knight, queen)
            .map_or_else(|| snapshot.enemy_queen().center(), Site::center);
        let shelter = farthest_shelter(snapshot, origin)?;

        let path = PathPlanner::new(snapshot).plan(queen, shelter, None);
        let offset = queen - shelter.center();
        let gap = offset.length();
        if path.detour || gap == 0.0 {
            return Some(QueenAction::Move {
                target: path.target(),
            });
        }

        let radial = offset * ((shelter.radius() + QUEEN_RADIUS) / gap);
        let threat = centroid - shelter.center();
        let left = radial.perp();
        let right = -left;
        let escape = if distance(left, threat) > distance(right, threat) {
            left
        } else {
            right
        };
        Some(QueenAction::Move {
            target: (shelter.center() + escape).round().as_ivec2(),
        })
    }
}

fn farthest_shelter(snapshot: &WorldSnapshot, origin: DVec2) -> Option<&Site> {
    let mut best: Option<(f64, &Site)> = None;
    for site in snapshot.sites() {
        if !is_shelter(snapshot, site) {
            continue;
        }
        let dist = distance(origin, site.center());
        if best.map_or(true, |(farthest, _)| dist > farthest) {
            best = Some((dist, site));
        }
    }
    best.map(|(_, site)| site)
}

/// Own towers, and empty sites inside the range of an own tower.
fn is_shelter(snapshot: &WorldSnapshot, site: &Site) -> bool {
    if site.is(Owner::Friendly, StructureKind::Tower) {
        return true;
    }
    site.structure.kind() == StructureKind::Empty
        && snapshot.sites().iter().any(|tower| {
            tower.is(Owner::Friendly, StructureKind::Tower)
                && distance(tower.center(), site.center()) <= tower.structure.tower_range()
        })
}
