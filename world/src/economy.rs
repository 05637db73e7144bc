//! Estimator for the opponent's hidden gold balance.

use std::collections::BTreeMap;

use glam::IVec2;
use royale_core::{geometry::in_contact, Owner, Site, SiteId, StructureKind, Unit, QUEEN_RADIUS};

/// Gold each side holds when the match starts.
const STARTING_GOLD: u32 = 100;

/// Result of folding one turn into the estimator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EconomyEstimate {
    /// Estimated gold held by the opponent, never negative.
    pub(crate) gold: u32,
    /// Income rate reported by the opponent's mines this turn.
    pub(crate) income: u32,
}

/// Per-mine ramp counters and the running gold estimate.
#[derive(Debug)]
pub(crate) struct EnemyEconomy {
    ramps: BTreeMap<SiteId, u32>,
    gold: u32,
    previous_queen: Option<IVec2>,
}

impl EnemyEconomy {
    /// Creates an estimator holding the starting purse and no ramps.
    pub(crate) fn new() -> Self {
        Self {
            ramps: BTreeMap::new(),
            gold: STARTING_GOLD,
            previous_queen: None,
        }
    }

    /// Advances the estimate by one turn.
    ///
    /// A freshly captured mine ramps to one immediately. While the enemy queen
    /// stands still in contact with a mine, that mine ramps by one more tick.
    /// Purchases are detected by a barracks countdown equal to its full
    /// training duration.
    pub(crate) fn observe(&mut self, sites: &[Site], enemy_queen: &Unit) -> EconomyEstimate {
        let stationary = self.previous_queen == Some(enemy_queen.position);
        let mut income: u32 = 0;

        for site in sites {
            if site.is(Owner::Enemy, StructureKind::Mine) {
                let ramp = self.ramps.entry(site.id()).or_insert(0);
                if *ramp == 0 {
                    *ramp = 1;
                } else if stationary
                    && in_contact(
                        enemy_queen.center(),
                        QUEEN_RADIUS,
                        site.center(),
                        site.radius(),
                    )
                {
                    *ramp += 1;
                }
                self.gold = self.gold.saturating_add(*ramp);
                income = income.saturating_add(site.structure.income_rate());
            } else {
                let _ = self.ramps.insert(site.id(), 0);
            }

            if site.owner == Owner::Enemy {
                if let Some(kind) = site.structure.barracks() {
                    if site.structure.turns_until_train() == kind.training_turns() {
                        self.gold = self.gold.saturating_sub(kind.unit_cost());
                    }
                }
            }
        }

        self.previous_queen = Some(enemy_queen.position);
        EconomyEstimate {
            gold: self.gold,
            income,
        }
    }

    #[cfg(test)]
    fn ramp(&self, id: SiteId) -> u32 {
        self.ramps.get(&id).copied().unwrap_or(0)
    }
}
