//! Core types for Hearthfield: entities, positions, inventory, and the world model.
//!
//! This crate only holds state. It knows nothing about ticks, agents, or
//! randomness; the simulation engine in `hf-simulation` owns a [`World`] and
//! drives every mutation through it.

/// Day/night cycle and year counter.
pub mod calendar;
/// Entity identifiers and the plain records for every entity kind.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Ground-plane positions and vector math.
pub mod geometry;
/// Shared building-material counters.
pub mod inventory;
/// The central world model that owns every entity collection.
pub mod world;

/// Re-export of the calendar.
pub use calendar::Calendar;
/// Re-export core entity types.
pub use entity::{
    Animal, AnimalKind, Bonfire, EntityId, FoodKind, FoodSource, House, HouseLevel, Human,
    ResourceKind, ResourceNode, Tree, TreeStage,
};
/// Re-export error types.
pub use error::{HfError, HfResult};
/// Re-export of [`geometry::Position`].
pub use geometry::Position;
/// Re-export inventory types.
pub use inventory::{Inventory, Material};
/// Re-export of [`world::World`].
pub use world::World;
