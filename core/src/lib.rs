#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Royale decision engine.
//!
//! This crate defines the vocabulary that connects the protocol adapter, the
//! per-turn world snapshot, and the pure decision systems. The adapter decodes
//! raw turn input into [`Site`] and [`Unit`] values, the world crate folds them
//! into an immutable snapshot, and systems answer with [`QueenAction`]
//! proposals that the turn engine merges into a single [`Move`].

pub mod geometry;

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the arena measured in world units.
pub const ARENA_WIDTH: f64 = 1920.0;
/// Height of the arena measured in world units.
pub const ARENA_HEIGHT: f64 = 1000.0;
/// Gap between two circle boundaries under which they are considered touching.
pub const CONTACT_RANGE: f64 = 5.0;
/// Distance the queen covers in a single turn.
pub const QUEEN_SPEED: f64 = 60.0;
/// Collision radius of the queen.
pub const QUEEN_RADIUS: f64 = 30.0;
/// Distance a knight covers in a single turn.
pub const KNIGHT_SPEED: f64 = 100.0;
/// Collision radius of a knight.
pub const KNIGHT_RADIUS: f64 = 20.0;
/// Health a tower is capped at.
pub const TOWER_MAX_HEALTH: u32 = 800;
/// Health a single build order restores on an existing tower.
pub const TOWER_REPAIR_STEP: u32 = 100;

/// Side of the match a site or unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Nobody controls the entity.
    Neutral,
    /// The entity belongs to this agent.
    Friendly,
    /// The entity belongs to the opponent.
    Enemy,
}

impl Owner {
    /// Decodes the owner code used by the match protocol.
    pub fn from_code(code: i32) -> Result<Self, CodeError> {
        match code {
            -1 => Ok(Self::Neutral),
            0 => Ok(Self::Friendly),
            1 => Ok(Self::Enemy),
            _ => Err(CodeError::new("owner", code)),
        }
    }
}

/// Kinds of units that may roam the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// The builder unit; exactly one per side.
    Queen,
    /// Fast melee unit that hunts the enemy queen.
    Knight,
    /// Ranged unit that defends against knights.
    Archer,
    /// Slow heavy unit that destroys towers.
    Giant,
}

impl UnitKind {
    /// Decodes the unit type code used by the match protocol.
    pub fn from_code(code: i32) -> Result<Self, CodeError> {
        match code {
            -1 => Ok(Self::Queen),
            0 => Ok(Self::Knight),
            1 => Ok(Self::Archer),
            2 => Ok(Self::Giant),
            _ => Err(CodeError::new("unit type", code)),
        }
    }
}

/// Unit families a barracks can be dedicated to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarracksKind {
    /// Produces knights.
    Knight,
    /// Produces archers.
    Archer,
    /// Produces giants.
    Giant,
}

impl BarracksKind {
    /// Decodes the barracks type code used by the match protocol.
    pub fn from_code(code: i32) -> Result<Self, CodeError> {
        match code {
            0 => Ok(Self::Knight),
            1 => Ok(Self::Archer),
            2 => Ok(Self::Giant),
            _ => Err(CodeError::new("barracks type", code)),
        }
    }

    /// Gold charged for one training order at this barracks.
    #[must_use]
    pub const fn unit_cost(self) -> u32 {
        match self {
            Self::Knight => 80,
            Self::Archer => 100,
            Self::Giant => 140,
        }
    }

    /// Countdown reported on the turn a training order was accepted.
    #[must_use]
    pub const fn training_turns(self) -> u32 {
        match self {
            Self::Knight => 4,
            Self::Archer => 7,
            Self::Giant => 9,
        }
    }
}

/// Fieldless discriminant of a [`Structure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Nothing is built on the site.
    Empty,
    /// Gold mine.
    Mine,
    /// Defensive tower.
    Tower,
    /// Unit-producing barracks.
    Barracks,
}

impl StructureKind {
    /// Decodes the structure type code used by the match protocol.
    pub fn from_code(code: i32) -> Result<Self, CodeError> {
        match code {
            -1 => Ok(Self::Empty),
            0 => Ok(Self::Mine),
            1 => Ok(Self::Tower),
            2 => Ok(Self::Barracks),
            _ => Err(CodeError::new("structure type", code)),
        }
    }
}

/// Structure standing on a site this turn, with its kind-specific fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Structure {
    /// Nothing is built on the site.
    Empty,
    /// Gold mine extracting `income_rate` gold per turn.
    Mine {
        /// Gold extracted per turn.
        income_rate: u32,
    },
    /// Defensive tower.
    Tower {
        /// Remaining tower health.
        health: u32,
        /// Radius the tower currently covers.
        attack_radius: u32,
    },
    /// Barracks dedicated to a single unit family.
    Barracks {
        /// Unit family trained here.
        kind: BarracksKind,
        /// Turns left before the barracks can accept a new order.
        turns_until_train: u32,
    },
}

impl Structure {
    /// Discriminant of the structure.
    #[must_use]
    pub const fn kind(&self) -> StructureKind {
        match self {
            Self::Empty => StructureKind::Empty,
            Self::Mine { .. } => StructureKind::Mine,
            Self::Tower { .. } => StructureKind::Tower,
            Self::Barracks { .. } => StructureKind::Barracks,
        }
    }

    /// Gold per turn for mines, zero otherwise.
    #[must_use]
    pub const fn income_rate(&self) -> u32 {
        match self {
            Self::Mine { income_rate } => *income_rate,
            _ => 0,
        }
    }

    /// Tower health, zero for anything but a tower.
    #[must_use]
    pub const fn tower_health(&self) -> u32 {
        match self {
            Self::Tower { health, .. } => *health,
            _ => 0,
        }
    }

    /// Tower coverage radius, zero for anything but a tower.
    #[must_use]
    pub const fn tower_range(&self) -> f64 {
        match self {
            Self::Tower { attack_radius, .. } => *attack_radius as f64,
            _ => 0.0,
        }
    }

    /// Barracks family, if the structure is a barracks.
    #[must_use]
    pub const fn barracks(&self) -> Option<BarracksKind> {
        match self {
            Self::Barracks { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Training countdown, zero for anything but a barracks.
    #[must_use]
    pub const fn turns_until_train(&self) -> u32 {
        match self {
            Self::Barracks {
                turns_until_train, ..
            } => *turns_until_train,
            _ => 0,
        }
    }
}

/// Unique identifier assigned to a structure site for the whole match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(u32);

impl SiteId {
    /// Creates a new site identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable placement of a site, fixed for the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteGeometry {
    /// Identifier of the site.
    pub id: SiteId,
    /// Center of the site circle.
    pub position: IVec2,
    /// Radius of the site circle.
    pub radius: u32,
}

impl SiteGeometry {
    /// Creates a new site geometry descriptor.
    #[must_use]
    pub const fn new(id: SiteId, position: IVec2, radius: u32) -> Self {
        Self {
            id,
            position,
            radius,
        }
    }
}

/// A structure site as observed this turn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Fixed placement of the site.
    pub geometry: SiteGeometry,
    /// Current owner.
    pub owner: Owner,
    /// Structure currently standing on the site.
    pub structure: Structure,
    /// Gold left in the ground, when the protocol reveals it.
    pub gold: Option<u32>,
    /// Largest income rate a mine on this site can reach, when revealed.
    pub max_mine_size: Option<u32>,
}

impl Site {
    /// Identifier of the site.
    #[must_use]
    pub const fn id(&self) -> SiteId {
        self.geometry.id
    }

    /// Center of the site in double precision.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        self.geometry.position.as_dvec2()
    }

    /// Radius of the site in double precision.
    #[must_use]
    pub fn radius(&self) -> f64 {
        f64::from(self.geometry.radius)
    }

    /// Reports whether the site holds the given structure kind for the given owner.
    #[must_use]
    pub fn is(&self, owner: Owner, kind: StructureKind) -> bool {
        self.owner == owner && self.structure.kind() == kind
    }

    /// Reports whether the site is a barracks of the given family and owner.
    #[must_use]
    pub fn is_barracks(&self, owner: Owner, kind: BarracksKind) -> bool {
        self.owner == owner && self.structure.barracks() == Some(kind)
    }

    /// Remaining gold, where an unknown or exhausted reading counts as one.
    ///
    /// The build cascade depends on this reading: unknown gold is treated as
    /// "still worth mining" rather than as an empty site.
    #[must_use]
    pub fn gold_or_one(&self) -> u32 {
        match self.gold {
            None | Some(0) => 1,
            Some(gold) => gold,
        }
    }
}

/// A unit as observed this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Position of the unit.
    pub position: IVec2,
    /// Side controlling the unit.
    pub owner: Owner,
    /// Kind of unit.
    pub kind: UnitKind,
    /// Remaining health.
    pub health: u32,
}

impl Unit {
    /// Position in double precision.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        self.position.as_dvec2()
    }

    /// Reports whether the unit matches the given owner and kind.
    #[must_use]
    pub fn is(&self, owner: Owner, kind: UnitKind) -> bool {
        self.owner == owner && self.kind == kind
    }
}

/// Structure a build order asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Blueprint {
    /// Build or upgrade a mine.
    Mine,
    /// Build or repair a tower.
    Tower,
    /// Build a barracks of the given family.
    Barracks(BarracksKind),
}

impl Blueprint {
    /// Structure kind the blueprint produces.
    #[must_use]
    pub const fn kind(self) -> StructureKind {
        match self {
            Self::Mine => StructureKind::Mine,
            Self::Tower => StructureKind::Tower,
            Self::Barracks(_) => StructureKind::Barracks,
        }
    }
}

/// What the queen does this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueenAction {
    /// Walk toward the target coordinates.
    Move {
        /// Destination of the walk.
        target: IVec2,
    },
    /// Build on the touched site.
    Build {
        /// Site receiving the build order.
        site: SiteId,
        /// Structure requested.
        blueprint: Blueprint,
    },
}

impl QueenAction {
    /// Movement target, if the action is a walk.
    #[must_use]
    pub const fn target(&self) -> Option<IVec2> {
        match self {
            Self::Move { target } => Some(*target),
            Self::Build { .. } => None,
        }
    }
}

/// The complete per-turn decision.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Queen order, or `None` to wait.
    pub queen: Option<QueenAction>,
    /// Barracks that receive a training order, in funding order.
    pub train: Vec<SiteId>,
}

/// Enumeration code received from upstream that this engine does not know.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unsupported {field} code {code}")]
pub struct CodeError {
    field: &'static str,
    code: i32,
}

impl CodeError {
    /// Creates a new error for the named field.
    #[must_use]
    pub const fn new(field: &'static str, code: i32) -> Self {
        Self { field, code }
    }

    /// Offending code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_site(gold: Option<u32>) -> Site {
        Site {
            geometry: SiteGeometry::new(SiteId::new(3), IVec2::new(400, 500), 50),
            owner: Owner::Neutral,
            structure: Structure::Empty,
            gold,
            max_mine_size: None,
        }
    }

    #[test]
    fn codes_decode_to_protocol_enumerations() {
        assert_eq!(Owner::from_code(-1), Ok(Owner::Neutral));
        assert_eq!(Owner::from_code(1), Ok(Owner::Enemy));
        assert_eq!(UnitKind::from_code(-1), Ok(UnitKind::Queen));
        assert_eq!(BarracksKind::from_code(2), Ok(BarracksKind::Giant));
        assert_eq!(StructureKind::from_code(1), Ok(StructureKind::Tower));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let error = Owner::from_code(7).expect_err("7 is not an owner");
        assert_eq!(error.code(), 7);
        assert_eq!(error.to_string(), "unsupported owner code 7");
        assert!(BarracksKind::from_code(-1).is_err());
        assert!(UnitKind::from_code(3).is_err());
    }

    #[test]
    fn gold_fallback_treats_unknown_and_zero_as_one() {
        assert_eq!(mine_site(None).gold_or_one(), 1);
        assert_eq!(mine_site(Some(0)).gold_or_one(), 1);
        assert_eq!(mine_site(Some(140)).gold_or_one(), 140);
    }

    #[test]
    fn structure_accessors_default_to_zero() {
        let tower = Structure::Tower {
            health: 420,
            attack_radius: 310,
        };
        assert_eq!(tower.kind(), StructureKind::Tower);
        assert_eq!(tower.tower_health(), 420);
        assert!((tower.tower_range() - 310.0).abs() < f64::EPSILON);
        assert_eq!(tower.income_rate(), 0);
        assert_eq!(tower.barracks(), None);
        assert_eq!(Structure::Empty.turns_until_train(), 0);
    }

    #[test]
    fn blueprint_kind_ignores_barracks_family() {
        assert_eq!(
            Blueprint::Barracks(BarracksKind::Giant).kind(),
            Blueprint::Barracks(BarracksKind::Knight).kind()
        );
        assert_ne!(Blueprint::Mine.kind(), Blueprint::Tower.kind());
    }

    #[test]
    fn training_constants_match_protocol() {
        assert_eq!(BarracksKind::Knight.unit_cost(), 80);
        assert_eq!(BarracksKind::Giant.training_turns(), 9);
        assert_eq!(BarracksKind::Archer.training_turns(), 7);
    }

    #[test]
    fn move_serializes_through_json() {
        let decided = Move {
            queen: Some(QueenAction::Build {
                site: SiteId::new(4),
                blueprint: Blueprint::Barracks(BarracksKind::Knight),
            }),
            train: vec![SiteId::new(1), SiteId::new(9)],
        };
        let json = serde_json::to_string(&decided).expect("serialize");
        let restored: Move = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, decided);
    }
}
