#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy training orders funded from the current gold balance.

use royale_core::{geometry::distance, BarracksKind, Owner, SiteId};
use royale_world::WorldSnapshot;

/// Training system that spends gold on knights first, then giants.
#[derive(Clone, Copy, Debug, Default)]
pub struct Training;

impl Training {
    /// Creates the training system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Lists the barracks to train from this turn, in funding order.
    ///
    /// Knight barracks closest to the enemy queen are funded first. Giant
    /// barracks follow in site order. Archers are never trained. Returns
    /// `None` when nothing can be afforded.
    #[must_use]
    pub fn handle(&self, snapshot: &WorldSnapshot) -> Option<Vec<SiteId>> {
        let enemy_queen = snapshot.enemy_queen().center();
        let mut knights: Vec<_> = snapshot
            .sites()
            .iter()
            .filter(|site| site.is_barracks(Owner::Friendly, BarracksKind::Knight))
            .collect();
        knights.sort_by(|a, b| {
            distance(a.center(), enemy_queen).total_cmp(&distance(b.center(), enemy_queen))
        });
        let giants = snapshot
            .sites()
            .iter()
            .filter(|site| site.is_barracks(Owner::Friendly, BarracksKind::Giant));

        let mut gold = snapshot.gold();
        let mut funded = Vec::new();
        for (site, cost) in knights
            .into_iter()
            .map(|site| (site, BarracksKind::Knight.unit_cost()))
            .chain(giants.map(|site| (site, BarracksKind::Giant.unit_cost())))
        {
            if gold >= cost {
                gold -= cost;
                funded.push(site.id());
            }
        }

        if funded.is_empty() {
            None
        } else {
            Some(funded)
        }
    }
}
