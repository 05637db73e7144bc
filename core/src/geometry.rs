//! Pure double-precision geometry shared by the planner and the decision systems.

use glam::DVec2;

use crate::{ARENA_HEIGHT, ARENA_WIDTH, CONTACT_RANGE};

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Reports whether two circles are within [`CONTACT_RANGE`] of touching.
#[must_use]
pub fn in_contact(a: DVec2, radius_a: f64, b: DVec2, radius_b: f64) -> bool {
    distance(a, b) - radius_a - radius_b < CONTACT_RANGE
}

/// Perpendicular distance from `point` to the infinite line through `start` and `end`.
///
/// Degenerate lines (`start == end`) yield `NaN`, which compares false against
/// every threshold.
#[must_use]
pub fn distance_to_line(start: DVec2, end: DVec2, point: DVec2) -> f64 {
    let edge = end - start;
    edge.perp_dot(point - start).abs() / edge.length()
}

/// Reports whether the projection of `point` lands strictly inside the segment.
#[must_use]
pub fn projects_onto_segment(start: DVec2, end: DVec2, point: DVec2) -> bool {
    let edge = end - start;
    let along = edge.dot(point - start);
    along > 0.0 && along < edge.length_squared()
}

/// Reports whether the circle at `center` blocks the segment from `start` to `end`.
///
/// Circles whose projection falls before `start` or beyond `end` never block,
/// even when they overlap an endpoint.
#[must_use]
pub fn is_obstacle(start: DVec2, end: DVec2, center: DVec2, radius: f64) -> bool {
    distance_to_line(start, end, center) < radius && projects_onto_segment(start, end, center)
}

/// Reports whether a point lies inside the closed arena rectangle.
#[must_use]
pub fn in_arena(point: DVec2) -> bool {
    (0.0..=ARENA_WIDTH).contains(&point.x) && (0.0..=ARENA_HEIGHT).contains(&point.y)
}

/// Enumerates every integer offset from `origin` reachable within `speed`,
/// clipped to the arena, column by column.
pub fn reachable_points(origin: DVec2, speed: f64) -> impl Iterator<Item = DVec2> {
    let reach = speed.floor() as i32;
    (-reach..=reach)
        .flat_map(move |dx| {
            (-reach..=reach).map(move |dy| DVec2::new(f64::from(dx), f64::from(dy)))
        })
        .map(move |offset| origin + offset)
        .filter(move |point| in_arena(*point) && distance(origin, *point) <= speed)
}
