#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Structure decisions for the site the queen is touching.

use royale_core::{
    Blueprint, Owner, QueenAction, StructureKind, TOWER_MAX_HEALTH, TOWER_REPAIR_STEP,
};
use royale_system_build_advisor::advise;
use royale_world::{query, WorldSnapshot};

/// Priority of a structure order; it outranks every other queen proposal.
pub const PRIORITY: u8 = 3;

/// Structure system issuing build, upgrade, and repair orders.
#[derive(Clone, Copy, Debug, Default)]
pub struct Structures;

impl Structures {
    /// Creates the structure system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Proposes a build order on the touched site.
    ///
    /// When the advised structure is already standing, the order becomes a
    /// routine upgrade instead: a mine below its maximum size is deepened and
    /// a tower missing at least half a repair step is reinforced. Upgrades are
    /// skipped while enemy knights threaten the queen.
    #[must_use]
    pub fn handle(&self, snapshot: &WorldSnapshot) -> Option<QueenAction> {
        let site = snapshot.touched_site()?;
        let advice = advise(snapshot, site, false);

        let blueprint = match advice {
            Some(decision) if decision.blueprint.kind() != site.structure.kind() => {
                decision.blueprint
            }
            _ => {
                if query::is_under_threat(snapshot) || site.owner != Owner::Friendly {
                    return None;
                }
                match site.structure.kind() {
                    StructureKind::Mine
                        if site.max_mine_size.unwrap_or(0) > site.structure.income_rate() =>
                    {
                        Blueprint::Mine
                    }
                    StructureKind::Tower
                        if TOWER_MAX_HEALTH.saturating_sub(site.structure.tower_health())
                            >= TOWER_REPAIR_STEP / 2 =>
                    {
                        Blueprint::Tower
                    }
                    _ => return None,
                }
            }
        };

        Some(QueenAction::Build {
            site: site.id(),
            blueprint,
        })
    }
}
