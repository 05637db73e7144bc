#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine that arbitrates queen proposals and merges training orders.
//!
//! Queen rules are evaluated in a fixed order. A rule whose priority is below
//! the current winner is not consulted at all, and a proposal of equal or
//! higher priority replaces the winner, so later rules win ties. The winning
//! walk is then checked against friendly knight lanes before the training
//! orders are attached.

use royale_core::{Move, QueenAction};
use royale_system_expansion::Expansion;
use royale_system_give_way::GiveWay;
use royale_system_retreat::Retreat;
use royale_system_structures::Structures;
use royale_system_training::Training;
use royale_world::WorldSnapshot;
use tracing::debug;

/// Closed set of rules competing for the queen's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueenRule {
    /// Walk toward new territory.
    Expansion,
    /// Build on the touched site.
    Structures,
    /// Run for tower cover.
    Retreat,
}

impl QueenRule {
    /// Evaluation order of the rules.
    pub const ORDER: [Self; 3] = [Self::Expansion, Self::Structures, Self::Retreat];

    /// Priority of the rule's proposals; higher wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Expansion => royale_system_expansion::PRIORITY,
            Self::Structures => royale_system_structures::PRIORITY,
            Self::Retreat => royale_system_retreat::PRIORITY,
        }
    }

    /// Asks the rule for a proposal.
    #[must_use]
    pub fn propose(self, snapshot: &WorldSnapshot) -> Option<QueenAction> {
        match self {
            Self::Expansion => Expansion::new().handle(snapshot),
            Self::Structures => Structures::new().handle(snapshot),
            Self::Retreat => Retreat::new().handle(snapshot),
        }
    }
}

/// Decides one complete move per turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnEngine {
    give_way: GiveWay,
    training: Training,
}

impl TurnEngine {
    /// Creates the turn engine.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            give_way: GiveWay::new(),
            training: Training::new(),
        }
    }

    /// Decides the move for the given snapshot.
    ///
    /// When every rule abstains the move carries no queen action and only the
    /// training orders, if any.
    #[must_use]
    pub fn decide(&self, snapshot: &WorldSnapshot) -> Move {
        let mut winner: Option<(QueenRule, QueenAction)> = None;
        for rule in QueenRule::ORDER {
            if winner.map_or(false, |(current, _)| current.priority() > rule.priority()) {
                continue;
            }
            if let Some(action) = rule.propose(snapshot) {
                debug!(?rule, ?action, "queen rule proposed");
                winner = Some((rule, action));
            }
        }

        let queen = winner.map(|(rule, action)| {
            let correction = action
                .target()
                .and_then(|target| self.give_way.handle(snapshot, target));
            match correction {
                Some(corrected) => {
                    debug!(?rule, ?action, ?corrected, "queen gives way to knight");
                    corrected
                }
                None => action,
            }
        });
        let train = self.training.handle(snapshot).unwrap_or_default();

        debug!(queen = ?queen, train = train.len(), "turn decided");
        Move { queen, train }
    }
}
