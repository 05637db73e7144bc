#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Keeps the queen out of the lanes her own knights are charging along.

use glam::{DVec2, IVec2};
use royale_core::{
    geometry::{distance, reachable_points},
    Owner, QueenAction, UnitKind, KNIGHT_RADIUS, KNIGHT_SPEED, QUEEN_RADIUS, QUEEN_SPEED,
};
use royale_world::WorldSnapshot;

/// Sub-steps of one knight turn checked for a collision.
const STEP_CHUNKS: u32 = 5;
/// Closest the queen may stand to a charging knight.
const CLEARANCE: f64 = KNIGHT_RADIUS + QUEEN_RADIUS;

/// Correction applied to a movement chosen by another system.
#[derive(Clone, Copy, Debug, Default)]
pub struct GiveWay;

impl GiveWay {
    /// Creates the correction system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Replaces a walk toward `target` when the one-turn step toward it lies
    /// in the charge lane of a friendly knight.
    ///
    /// The substitute is the reachable point nearest the preferred step that
    /// stays clear of that knight. The first knight whose lane is blocked and
    /// who leaves a clear alternative decides.
    #[must_use]
    pub fn handle(&self, snapshot: &WorldSnapshot, target: IVec2) -> Option<QueenAction> {
        let queen = snapshot.my_queen().position;
        let gap = distance(queen.as_dvec2(), target.as_dvec2());
        if gap == 0.0 {
            return None;
        }
        let preferred =
            queen.as_dvec2() + ((target - queen).as_dvec2() * (QUEEN_SPEED / gap)).round();
        let enemy_queen = snapshot.enemy_queen().position;

        for knight in snapshot.units_of(Owner::Friendly, UnitKind::Knight) {
            if !in_charge_lane(knight.position, enemy_queen, preferred) {
                continue;
            }

            let mut best: Option<(f64, DVec2)> = None;
            for candidate in reachable_points(queen.as_dvec2(), QUEEN_SPEED) {
                if in_charge_lane(knight.position, enemy_queen, candidate) {
                    continue;
                }
                let dist = distance(candidate, preferred);
                if best.map_or(true, |(closest, _)| dist < closest) {
                    best = Some((dist, candidate));
                }
            }
            if let Some((_, step)) = best {
                return Some(QueenAction::Move {
                    target: step.round().as_ivec2(),
                });
            }
        }
        None
    }
}

/// Reports whether a knight charging at the enemy queen passes within
/// clearance of `step` during its next turn.
#[must_use]
pub fn in_charge_lane(knight: IVec2, enemy_queen: IVec2, step: DVec2) -> bool {
    let span = distance(knight.as_dvec2(), enemy_queen.as_dvec2());
    if span == 0.0 {
        return false;
    }
    let heading = (enemy_queen - knight).as_dvec2();
    (1..=STEP_CHUNKS).any(|chunk| {
        let fraction = KNIGHT_SPEED * f64::from(chunk) / f64::from(STEP_CHUNKS) / span;
        let position = knight.as_dvec2() + (heading * fraction).round();
        distance(position, step) < CLEARANCE
    })
}
