use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::inventory::Material;

/// Stable identifier for an entity, unique within its world.
///
/// Identifiers are handed out by [`World`](crate::World) from a single
/// monotonic counter and are never reused, so a removed entity's id never
/// reappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Placeholder carried by records that have not been inserted yet.
    pub const UNASSIGNED: Self = Self(0);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Humans
// ---------------------------------------------------------------------------

/// An autonomous human agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Human {
    pub id: EntityId,
    pub name: String,
    /// Last stored position. The spatial lookup may hold a fresher one.
    pub position: Position,
    /// Satiation in `0..=100`. At or below zero the human dies.
    pub hunger: f64,
    /// Age in years.
    pub age: f64,
    /// Ticks left before this human may reproduce again.
    pub reproduction_cooldown: u32,
    /// Accumulated experience. Never decreases.
    pub xp: f64,
    /// The house this human owns, if any.
    pub house: Option<EntityId>,
}

impl Human {
    /// Create a fully fed newborn at `position`.
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            position,
            hunger: 100.0,
            age: 0.0,
            reproduction_cooldown: 0,
            xp: 0.0,
            house: None,
        }
    }

    /// Set the age in years.
    pub fn with_age(mut self, age: f64) -> Self {
        self.age = age;
        self
    }

    /// Set the hunger level.
    pub fn with_hunger(mut self, hunger: f64) -> Self {
        self.hunger = hunger;
        self
    }

    /// Set the experience.
    pub fn with_xp(mut self, xp: f64) -> Self {
        self.xp = xp;
        self
    }

    /// Set the reproduction cooldown.
    pub fn with_cooldown(mut self, ticks: u32) -> Self {
        self.reproduction_cooldown = ticks;
        self
    }

    /// Return `true` once hunger has run out.
    pub fn is_starved(&self) -> bool {
        self.hunger <= 0.0
    }
}

// ---------------------------------------------------------------------------
// Food
// ---------------------------------------------------------------------------

/// Where a food source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    /// Grows on its own; a single meal.
    Wild,
    /// Cultivated by an experienced human; several meals.
    Farm,
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wild => write!(f, "wild"),
            Self::Farm => write!(f, "farm"),
        }
    }
}

/// A place where humans eat. Removed once its capacity runs out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSource {
    pub id: EntityId,
    pub position: Position,
    pub kind: FoodKind,
    /// Meals left before depletion.
    pub capacity: u32,
}

impl FoodSource {
    /// Create a single-meal wild food source.
    pub fn wild(position: Position) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            position,
            kind: FoodKind::Wild,
            capacity: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Structures
// ---------------------------------------------------------------------------

/// Material tier of a house. Tiers only ever go up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseLevel {
    Wood,
    Stone,
    Iron,
}

impl HouseLevel {
    /// Numeric tier, 1 through 3.
    pub fn tier(self) -> u8 {
        match self {
            Self::Wood => 1,
            Self::Stone => 2,
            Self::Iron => 3,
        }
    }

    /// The next tier and the material it costs, if any.
    pub fn upgrade(self) -> Option<(HouseLevel, Material)> {
        match self {
            Self::Wood => Some((Self::Stone, Material::Stone)),
            Self::Stone => Some((Self::Iron, Material::Iron)),
            Self::Iron => None,
        }
    }
}

impl fmt::Display for HouseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wood => write!(f, "wood"),
            Self::Stone => write!(f, "stone"),
            Self::Iron => write!(f, "iron"),
        }
    }
}

/// A shelter. Owned by at most one human.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: EntityId,
    pub position: Position,
    pub owner: Option<EntityId>,
    pub level: HouseLevel,
}

impl House {
    /// Create an unowned wooden house.
    pub fn new(position: Position) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            position,
            owner: None,
            level: HouseLevel::Wood,
        }
    }
}

/// A permanent fire that shelters anyone standing close to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonfire {
    pub id: EntityId,
    pub position: Position,
}

impl Bonfire {
    /// Create a bonfire at `position`.
    pub fn new(position: Position) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            position,
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// What a resource node yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Rock,
    Iron,
}

impl ResourceKind {
    /// The inventory material one extraction produces.
    pub fn material(self) -> Material {
        match self {
            Self::Rock => Material::Stone,
            Self::Iron => Material::Iron,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rock => write!(f, "rock"),
            Self::Iron => write!(f, "iron"),
        }
    }
}

/// A mineable deposit. Removed when its durability runs out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: EntityId,
    pub position: Position,
    pub kind: ResourceKind,
    pub durability: u32,
}

impl ResourceNode {
    /// Create a node of `kind` with the given durability.
    pub fn new(kind: ResourceKind, position: Position, durability: u32) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            position,
            kind,
            durability,
        }
    }
}

/// Growth stage of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStage {
    Sapling,
    Young,
    Adult,
}

impl TreeStage {
    /// The following stage, or `None` for adults.
    pub fn next(self) -> Option<TreeStage> {
        match self {
            Self::Sapling => Some(Self::Young),
            Self::Young => Some(Self::Adult),
            Self::Adult => None,
        }
    }
}

/// A tree. Only adults can be felled or seed new saplings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub id: EntityId,
    pub position: Position,
    pub stage: TreeStage,
    /// Progress toward the next stage, in `0.0..1.0`.
    pub growth: f64,
}

impl Tree {
    /// Create a tree at the given stage with no growth progress.
    pub fn new(stage: TreeStage, position: Position) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            position,
            stage,
            growth: 0.0,
        }
    }

    /// Return `true` if the tree can be felled.
    pub fn is_adult(&self) -> bool {
        self.stage == TreeStage::Adult
    }
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

/// Species of wild animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalKind {
    Rabbit,
    Chicken,
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rabbit => write!(f, "rabbit"),
            Self::Chicken => write!(f, "chicken"),
        }
    }
}

/// A wandering animal that humans can hunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: EntityId,
    pub kind: AnimalKind,
    /// Last stored position. The spatial lookup may hold a fresher one.
    pub position: Position,
    pub age: f64,
    pub health: f64,
    pub reproduction_cooldown: u32,
}

impl Animal {
    /// Create a healthy newborn animal.
    pub fn new(kind: AnimalKind, position: Position) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            kind,
            position,
            age: 0.0,
            health: 100.0,
            reproduction_cooldown: 0,
        }
    }
}
