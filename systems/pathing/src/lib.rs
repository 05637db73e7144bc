#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-step path planner that walks the queen around circular sites.
//!
//! The planner answers one question per call: where should the queen step
//! this turn to reach a primary site, optionally continuing to a secondary
//! site afterwards. Sites standing on the straight line are bypassed through
//! tangent points on their boundary inflated by the queen's radius. The cost
//! of a plan estimates the total remaining travel, so callers can compare
//! candidate target pairs.

use glam::{DVec2, IVec2};
use royale_core::{
    geometry::{distance, in_contact, is_obstacle, reachable_points},
    Site, CONTACT_RANGE, QUEEN_RADIUS, QUEEN_SPEED,
};
use royale_world::WorldSnapshot;

/// Outcome of a planning request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Path {
    /// Estimated remaining travel distance.
    pub cost: f64,
    /// Position to head for this turn.
    pub step: DVec2,
    /// Indicates that the step bypasses an obstacle.
    pub detour: bool,
}

impl Path {
    /// Step rounded to the integer grid used by movement commands.
    #[must_use]
    pub fn target(&self) -> IVec2 {
        self.step.round().as_ivec2()
    }
}

/// Planner bound to a single snapshot.
#[derive(Clone, Copy, Debug)]
pub struct PathPlanner<'a> {
    snapshot: &'a WorldSnapshot,
}

impl<'a> PathPlanner<'a> {
    /// Creates a planner for the queen over the given snapshot.
    #[must_use]
    pub const fn new(snapshot: &'a WorldSnapshot) -> Self {
        Self { snapshot }
    }

    /// Plans the next step from `from` toward `first`, then `second` if given.
    ///
    /// Obstacles are bypassed one tangent point at a time. The number of
    /// consecutive bypasses is capped at the number of sites; once the cap is
    /// reached the remaining leg is planned as if the line were clear.
    #[must_use]
    pub fn plan(&self, from: DVec2, first: &Site, second: Option<&Site>) -> Path {
        let mut position = from;
        let mut walked = 0.0;
        let mut first_step = None;

        for _ in 0..self.snapshot.sites().len() {
            let Some((obstacle, gap)) = self.nearest_obstacle(position, first) else {
                break;
            };
            let tangent = self.tangent_point(position, obstacle, gap, first.center());
            walked += distance(position, tangent);
            let _ = first_step.get_or_insert(tangent);
            position = tangent;
        }

        let rest = self.plan_clear(position, first, second);
        match first_step {
            Some(step) => Path {
                cost: rest.cost + walked,
                step,
                detour: true,
            },
            None => rest,
        }
    }

    fn nearest_obstacle(&self, position: DVec2, target: &Site) -> Option<(&'a Site, f64)> {
        let mut best: Option<(&'a Site, f64)> = None;
        for site in self.snapshot.sites() {
            if site.id() == target.id() {
                continue;
            }
            let blocks = is_obstacle(
                position,
                target.center(),
                site.center(),
                site.radius() + QUEEN_RADIUS,
            );
            let dist = distance(position, site.center());
            if blocks && best.map_or(true, |(_, closest)| dist < closest) {
                best = Some((site, dist));
            }
        }
        best
    }

    /// Point on the obstacle's inflated boundary, perpendicular to the
    /// approach direction, on whichever side lies closer to `goal`.
    fn tangent_point(&self, position: DVec2, obstacle: &Site, gap: f64, goal: DVec2) -> DVec2 {
        let center = obstacle.center();
        let radial = (position - center) * ((obstacle.radius() + QUEEN_RADIUS) / gap);
        let toward_goal = goal - center;
        let left = radial.perp();
        let right = -left;
        if distance(left, toward_goal) > distance(right, toward_goal) {
            center + right
        } else {
            center + left
        }
    }

    fn plan_clear(&self, position: DVec2, first: &Site, second: Option<&Site>) -> Path {
        if let Some((step, remaining)) = self.arrival_step(position, first, second) {
            return Path {
                cost: QUEEN_SPEED + remaining,
                step,
                detour: false,
            };
        }

        let Some(second) = second else {
            return Path {
                cost: distance(position, first.center())
                    - first.radius()
                    - QUEEN_RADIUS
                    - CONTACT_RANGE,
                step: first.center(),
                detour: false,
            };
        };

        let inflated = first.radius() + QUEEN_RADIUS;
        if is_obstacle(position, second.center(), first.center(), inflated) {
            return self.plan(position, second, None);
        }

        let span = distance(second.center(), first.center());
        let waypoint = first.center() + (second.center() - first.center()) * (inflated / span);
        Path {
            cost: distance(position, waypoint) + distance(waypoint, second.center())
                - second.radius()
                - QUEEN_RADIUS
                - CONTACT_RANGE,
            step: waypoint,
            detour: false,
        }
    }

    /// Best point reachable this turn that touches `first`, scored by how
    /// close it leaves the queen to the follow-up anchor.
    fn arrival_step(
        &self,
        position: DVec2,
        first: &Site,
        second: Option<&Site>,
    ) -> Option<(DVec2, f64)> {
        let (anchor, anchor_radius) = match second {
            Some(site) => (site.center(), site.radius()),
            None => (self.snapshot.home_corner(), 0.0),
        };

        let mut best: Option<(DVec2, f64)> = None;
        for candidate in reachable_points(position, QUEEN_SPEED) {
            if !in_contact(candidate, QUEEN_RADIUS, first.center(), first.radius()) {
                continue;
            }
            let remaining =
                distance(candidate, anchor) - anchor_radius - QUEEN_RADIUS - CONTACT_RANGE;
            if best.map_or(true, |(_, lowest)| remaining < lowest) {
                best = Some((candidate, remaining));
            }
        }
        best
    }
}
