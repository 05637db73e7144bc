//! Scaffolding for building hand-written snapshots in downstream tests.

use glam::IVec2;
use royale_core::{Owner, SiteGeometry, SiteId, Structure, Unit, UnitKind};

use crate::{MatchContext, SiteReport, SnapshotError, TurnInput, WorldSnapshot};

/// Fluent description of a single turn on a custom map.
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    geometry: Vec<SiteGeometry>,
    input: TurnInput,
}

impl Scenario {
    /// Starts an empty scenario with no gold, sites, or units.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gold available to this agent.
    #[must_use]
    pub fn gold(mut self, gold: u32) -> Self {
        self.input.gold = gold;
        self
    }

    /// Reports the touched site explicitly instead of deriving it.
    #[must_use]
    pub fn touching(mut self, id: u32) -> Self {
        self.input.touched_site = Some(SiteId::new(id));
        self
    }

    /// Adds a unit with full health for its kind.
    #[must_use]
    pub fn unit(self, owner: Owner, kind: UnitKind, x: i32, y: i32) -> Self {
        let health = match kind {
            UnitKind::Queen => 200,
            UnitKind::Knight => 25,
            UnitKind::Archer => 45,
            UnitKind::Giant => 200,
        };
        self.unit_with_health(owner, kind, x, y, health)
    }

    /// Adds a unit with explicit health.
    #[must_use]
    pub fn unit_with_health(
        mut self,
        owner: Owner,
        kind: UnitKind,
        x: i32,
        y: i32,
        health: u32,
    ) -> Self {
        self.input.units.push(Unit {
            position: IVec2::new(x, y),
            owner,
            kind,
            health,
        });
        self
    }

    /// Adds both queens.
    #[must_use]
    pub fn queens(self, mine: (i32, i32), enemy: (i32, i32)) -> Self {
        self.unit(Owner::Friendly, UnitKind::Queen, mine.0, mine.1)
            .unit(Owner::Enemy, UnitKind::Queen, enemy.0, enemy.1)
    }

    /// Adds a site with the given facet and no resource readings.
    #[must_use]
    pub fn site(
        mut self,
        id: u32,
        position: (i32, i32),
        radius: u32,
        owner: Owner,
        structure: Structure,
    ) -> Self {
        let id = SiteId::new(id);
        self.geometry.push(SiteGeometry::new(
            id,
            IVec2::new(position.0, position.1),
            radius,
        ));
        self.input.sites.push(SiteReport {
            id,
            owner,
            structure,
            gold: None,
            max_mine_size: None,
        });
        self
    }

    /// Adds an empty neutral site.
    #[must_use]
    pub fn empty_site(self, id: u32, position: (i32, i32), radius: u32) -> Self {
        self.site(id, position, radius, Owner::Neutral, Structure::Empty)
    }

    /// Sets the resource readings of the most recently added site.
    #[must_use]
    pub fn resources(mut self, gold: Option<u32>, max_mine_size: Option<u32>) -> Self {
        if let Some(report) = self.input.sites.last_mut() {
            report.gold = gold;
            report.max_mine_size = max_mine_size;
        }
        self
    }

    /// Creates a fresh match context registering every scenario site.
    #[must_use]
    pub fn context(&self) -> MatchContext {
        MatchContext::new(self.geometry.iter().copied())
    }

    /// Turn input described by the scenario.
    #[must_use]
    pub fn input(&self) -> TurnInput {
        self.input.clone()
    }

    /// Builds the snapshot as the first turn of a fresh match.
    pub fn snapshot(&self) -> Result<WorldSnapshot, SnapshotError> {
        self.context().begin_turn(self.input())
    }
}
