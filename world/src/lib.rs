#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-turn world snapshot and match-lifetime context for the Royale engine.
//!
//! [`MatchContext`] is the only long-lived object in the engine. Every turn it
//! folds the decoded [`TurnInput`] into an immutable [`WorldSnapshot`],
//! assigning the home corner on the first turn and advancing the enemy economy
//! estimate. Systems only ever borrow the snapshot.

mod economy;
#[cfg(feature = "scenario")]
pub mod scenario;

use std::collections::BTreeMap;

use glam::DVec2;
use royale_core::{
    geometry::in_contact, Owner, Site, SiteGeometry, SiteId, Structure, Unit, UnitKind,
    ARENA_HEIGHT, ARENA_WIDTH, QUEEN_RADIUS,
};
use thiserror::Error;

use crate::economy::EnemyEconomy;

/// Fatal invariant violations detected while building a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The turn did not contain a queen for the given side.
    #[error("no {0:?} queen in turn input")]
    MissingQueen(Owner),
    /// The turn referenced a site that was never registered.
    #[error("site {} is not registered", .0.get())]
    UnknownSite(SiteId),
}

/// Per-turn facet of a site as decoded from the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SiteReport {
    /// Identifier of the reported site.
    pub id: SiteId,
    /// Current owner.
    pub owner: Owner,
    /// Structure currently standing on the site.
    pub structure: Structure,
    /// Gold left in the ground, if revealed.
    pub gold: Option<u32>,
    /// Largest achievable mine income, if revealed.
    pub max_mine_size: Option<u32>,
}

/// Everything the protocol reports for a single turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnInput {
    /// Gold available to this agent.
    pub gold: u32,
    /// Site the queen touches according to the protocol, if reported.
    pub touched_site: Option<SiteId>,
    /// Facets of every site.
    pub sites: Vec<SiteReport>,
    /// Every visible unit.
    pub units: Vec<Unit>,
}

/// Match-lifetime state threaded through every turn.
#[derive(Debug)]
pub struct MatchContext {
    geometry: BTreeMap<SiteId, SiteGeometry>,
    home_corner: Option<DVec2>,
    economy: EnemyEconomy,
}

impl MatchContext {
    /// Creates a context for a match played on the provided sites.
    #[must_use]
    pub fn new(sites: impl IntoIterator<Item = SiteGeometry>) -> Self {
        Self {
            geometry: sites.into_iter().map(|site| (site.id, site)).collect(),
            home_corner: None,
            economy: EnemyEconomy::new(),
        }
    }

    /// Number of registered sites.
    #[must_use]
    pub fn site_count(&self) -> usize {
        self.geometry.len()
    }

    /// Home corner, once the first turn assigned it.
    #[must_use]
    pub fn home_corner(&self) -> Option<DVec2> {
        self.home_corner
    }

    /// Folds a turn's input into an immutable snapshot.
    ///
    /// Validation happens before any match state is touched, so a rejected
    /// turn leaves the context exactly as it was.
    pub fn begin_turn(&mut self, input: TurnInput) -> Result<WorldSnapshot, SnapshotError> {
        let TurnInput {
            gold,
            touched_site,
            sites: reports,
            units,
        } = input;

        let sites = reports
            .into_iter()
            .map(|report| {
                let geometry = self
                    .geometry
                    .get(&report.id)
                    .copied()
                    .ok_or(SnapshotError::UnknownSite(report.id))?;
                Ok(Site {
                    geometry,
                    owner: report.owner,
                    structure: report.structure,
                    gold: report.gold,
                    max_mine_size: report.max_mine_size,
                })
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;
        let index: BTreeMap<SiteId, usize> = sites
            .iter()
            .enumerate()
            .map(|(position, site)| (site.id(), position))
            .collect();

        let my_queen = find_queen(&units, Owner::Friendly)?;
        let enemy_queen = find_queen(&units, Owner::Enemy)?;

        let touched = match touched_site {
            Some(id) if index.contains_key(&id) => Some(id),
            Some(id) => return Err(SnapshotError::UnknownSite(id)),
            None => derive_touched_site(&sites, &my_queen),
        };

        let home_corner = *self
            .home_corner
            .get_or_insert_with(|| home_corner_for(&my_queen));
        let income = sites
            .iter()
            .map(|site| site.structure.income_rate())
            .fold(0, u32::saturating_add);
        let estimate = self.economy.observe(&sites, &enemy_queen);

        tracing::debug!(
            gold,
            income,
            enemy_gold = estimate.gold,
            enemy_income = estimate.income,
            touched = ?touched,
            "turn snapshot built"
        );

        Ok(WorldSnapshot {
            sites,
            index,
            units,
            gold,
            touched,
            my_queen,
            enemy_queen,
            home_corner,
            income,
            enemy_gold: estimate.gold,
            enemy_income: estimate.income,
        })
    }
}

fn find_queen(units: &[Unit], owner: Owner) -> Result<Unit, SnapshotError> {
    units
        .iter()
        .find(|unit| unit.is(owner, UnitKind::Queen))
        .copied()
        .ok_or(SnapshotError::MissingQueen(owner))
}

fn derive_touched_site(sites: &[Site], queen: &Unit) -> Option<SiteId> {
    sites
        .iter()
        .filter(|site| in_contact(queen.center(), QUEEN_RADIUS, site.center(), site.radius()))
        .last()
        .map(Site::id)
}

fn home_corner_for(queen: &Unit) -> DVec2 {
    if queen.center().x < ARENA_WIDTH / 2.0 {
        DVec2::ZERO
    } else {
        DVec2::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

/// Immutable view of a single turn.
#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    sites: Vec<Site>,
    index: BTreeMap<SiteId, usize>,
    units: Vec<Unit>,
    gold: u32,
    touched: Option<SiteId>,
    my_queen: Unit,
    enemy_queen: Unit,
    home_corner: DVec2,
    income: u32,
    enemy_gold: u32,
    enemy_income: u32,
}

impl WorldSnapshot {
    /// Every site in protocol order.
    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Looks up a site by identifier.
    #[must_use]
    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.index.get(&id).map(|&position| &self.sites[position])
    }

    /// Every visible unit in protocol order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Gold available to this agent.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Site the queen is touching, reported or derived.
    #[must_use]
    pub fn touched_site(&self) -> Option<&Site> {
        self.touched.and_then(|id| self.site(id))
    }

    /// This agent's queen.
    #[must_use]
    pub const fn my_queen(&self) -> &Unit {
        &self.my_queen
    }

    /// The opponent's queen.
    #[must_use]
    pub const fn enemy_queen(&self) -> &Unit {
        &self.enemy_queen
    }

    /// Corner the queen started closest to; fixed for the match.
    #[must_use]
    pub const fn home_corner(&self) -> DVec2 {
        self.home_corner
    }

    /// Sum of the income rates reported for every mine.
    #[must_use]
    pub const fn income(&self) -> u32 {
        self.income
    }

    /// Estimated gold held by the opponent.
    #[must_use]
    pub const fn enemy_gold(&self) -> u32 {
        self.enemy_gold
    }

    /// Income rate of the opponent's mines.
    #[must_use]
    pub const fn enemy_income(&self) -> u32 {
        self.enemy_income
    }

    /// Units matching the given owner and kind.
    pub fn units_of(&self, owner: Owner, kind: UnitKind) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |unit| unit.is(owner, kind))
    }
}

/// Read-only questions about a snapshot shared by several systems.
pub mod query {
    use glam::DVec2;
    use royale_core::{
        geometry::{distance, is_obstacle},
        BarracksKind, Owner, Site, SiteId, StructureKind, Unit, UnitKind,
    };

    use super::WorldSnapshot;

    /// Enemy knights closer than this to the queen put her in danger.
    pub const DANGER_RADIUS: f64 = 300.0;
    /// Towers along a threat path considered enough while the enemy can pay.
    pub const COMFORT_TOWERS: usize = 2;

    /// Barracks of the given owner and family closest to `from`.
    #[must_use]
    pub fn closest_barracks(
        snapshot: &WorldSnapshot,
        owner: Owner,
        kind: BarracksKind,
        from: DVec2,
    ) -> Option<&Site> {
        let mut best: Option<(f64, &Site)> = None;
        for site in snapshot.sites() {
            if !site.is_barracks(owner, kind) {
                continue;
            }
            let dist = distance(from, site.center());
            if best.map_or(true, |(closest, _)| dist < closest) {
                best = Some((dist, site));
            }
        }
        best.map(|(_, site)| site)
    }

    /// Counts own towers covering either endpoint or the segment between them.
    #[must_use]
    pub fn towers_on_path(
        snapshot: &WorldSnapshot,
        from: DVec2,
        to: DVec2,
        ignore: Option<SiteId>,
    ) -> usize {
        snapshot
            .sites()
            .iter()
            .filter(|site| site.is(Owner::Friendly, StructureKind::Tower))
            .filter(|site| Some(site.id()) != ignore)
            .filter(|site| {
                let range = site.structure.tower_range();
                distance(from, site.center()) <= range
                    || distance(to, site.center()) <= range
                    || is_obstacle(from, to, site.center(), range)
            })
            .count()
    }

    /// Towers judged sufficient along a threat path.
    ///
    /// Zero while the opponent can neither afford a knight nor earn gold.
    #[must_use]
    pub fn comfort_tower_count(snapshot: &WorldSnapshot) -> usize {
        if snapshot.enemy_gold() < BarracksKind::Knight.unit_cost() && snapshot.enemy_income() == 0
        {
            0
        } else {
            COMFORT_TOWERS
        }
    }

    /// Enemy knights inside the danger radius around the queen.
    pub fn threatening_knights(snapshot: &WorldSnapshot) -> impl Iterator<Item = &Unit> {
        let queen = snapshot.my_queen().center();
        snapshot
            .units_of(Owner::Enemy, UnitKind::Knight)
            .filter(move |knight| distance(queen, knight.center()) < DANGER_RADIUS)
    }

    /// Reports whether any enemy knight is inside the danger radius.
    #[must_use]
    pub fn is_under_threat(snapshot: &WorldSnapshot) -> bool {
        threatening_knights(snapshot).next().is_some()
    }
}
