use std::collections::BTreeMap;

use crate::calendar::Calendar;
use crate::entity::{Animal, Bonfire, EntityId, FoodSource, House, Human, ResourceNode, Tree};
use crate::error::{HfError, HfResult};
use crate::geometry::Position;
use crate::inventory::Inventory;

/// Generates insert/lookup/iterate accessors for one entity collection.
///
/// Insertion validates the position and stamps a fresh id on the record.
macro_rules! collection_accessors {
    ($field:ident: $ty:ty, $add:ident, $get:ident, $get_mut:ident, $iter:ident, $len:ident) => {
        #[doc = concat!("Insert a `", stringify!($ty), "`, assigning it a fresh id.")]
        pub fn $add(&mut self, mut record: $ty) -> HfResult<EntityId> {
            record.position = record.position.validated()?;
            let id = self.allocate_id();
            record.id = id;
            self.$field.insert(id, record);
            Ok(id)
        }

        #[doc = concat!("Look up a `", stringify!($ty), "` by id.")]
        pub fn $get(&self, id: EntityId) -> Option<&$ty> {
            self.$field.get(&id)
        }

        #[doc = concat!("Look up a `", stringify!($ty), "` mutably by id.")]
        pub fn $get_mut(&mut self, id: EntityId) -> Option<&mut $ty> {
            self.$field.get_mut(&id)
        }

        #[doc = concat!("Iterate every `", stringify!($ty), "` in ascending id order.")]
        pub fn $iter(&self) -> impl Iterator<Item = &$ty> + '_ {
            self.$field.values()
        }

        #[doc = concat!("Number of `", stringify!($ty), "` records.")]
        pub fn $len(&self) -> usize {
            self.$field.len()
        }
    };
}

/// The authoritative world state. Owns every entity collection plus the
/// shared inventory and calendar.
///
/// Collections are keyed by id and iterate in ascending id order, which keeps
/// seeded simulations reproducible.
#[derive(Debug, Clone, Default)]
pub struct World {
    humans: BTreeMap<EntityId, Human>,
    foods: BTreeMap<EntityId, FoodSource>,
    houses: BTreeMap<EntityId, House>,
    bonfires: BTreeMap<EntityId, Bonfire>,
    resources: BTreeMap<EntityId, ResourceNode>,
    trees: BTreeMap<EntityId, Tree>,
    animals: BTreeMap<EntityId, Animal>,
    /// Shared building materials.
    pub inventory: Inventory,
    /// Tick counter, year and hour of day.
    pub calendar: Calendar,
    next_id: u64,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    collection_accessors!(humans: Human, add_human, human, human_mut, humans, population);
    collection_accessors!(foods: FoodSource, add_food, food, food_mut, foods, food_count);
    collection_accessors!(houses: House, add_house, house, house_mut, houses, house_count);
    collection_accessors!(bonfires: Bonfire, add_bonfire, bonfire, bonfire_mut, bonfires, bonfire_count);
    collection_accessors!(resources: ResourceNode, add_resource, resource, resource_mut, resources, resource_count);
    collection_accessors!(trees: Tree, add_tree, tree, tree_mut, trees, tree_count);
    collection_accessors!(animals: Animal, add_animal, animal, animal_mut, animals, animal_count);

    /// Ids of all living humans in ascending order.
    pub fn human_ids(&self) -> Vec<EntityId> {
        self.humans.keys().copied().collect()
    }

    /// Ids of all animals in ascending order.
    pub fn animal_ids(&self) -> Vec<EntityId> {
        self.animals.keys().copied().collect()
    }

    /// Iterate trees mutably in ascending id order.
    pub fn trees_mut(&mut self) -> impl Iterator<Item = &mut Tree> + '_ {
        self.trees.values_mut()
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove a human. The house it owned, if any, becomes unowned.
    pub fn remove_human(&mut self, id: EntityId) -> Option<Human> {
        let human = self.humans.remove(&id)?;
        if let Some(house) = human
            .house
            .and_then(|h| self.houses.get_mut(&h))
            .filter(|house| house.owner == Some(id))
        {
            house.owner = None;
        }
        Some(human)
    }

    /// Remove a food source.
    pub fn remove_food(&mut self, id: EntityId) -> Option<FoodSource> {
        self.foods.remove(&id)
    }

    /// Remove a resource node.
    pub fn remove_resource(&mut self, id: EntityId) -> Option<ResourceNode> {
        self.resources.remove(&id)
    }

    /// Remove a tree.
    pub fn remove_tree(&mut self, id: EntityId) -> Option<Tree> {
        self.trees.remove(&id)
    }

    /// Remove an animal.
    pub fn remove_animal(&mut self, id: EntityId) -> Option<Animal> {
        self.animals.remove(&id)
    }

    // -----------------------------------------------------------------------
    // Ownership
    // -----------------------------------------------------------------------

    /// Link a human and a house in both directions.
    ///
    /// Callers decide whether the claim is allowed; this only keeps the two
    /// references consistent.
    pub fn assign_house(&mut self, human_id: EntityId, house_id: EntityId) -> HfResult<()> {
        if !self.houses.contains_key(&house_id) {
            return Err(HfError::EntityNotFound(house_id));
        }
        let human = self
            .humans
            .get_mut(&human_id)
            .ok_or(HfError::EntityNotFound(human_id))?;
        human.house = Some(house_id);
        if let Some(house) = self.houses.get_mut(&house_id) {
            house.owner = Some(human_id);
        }
        Ok(())
    }

    /// The house owned by `human_id`, if both still exist.
    pub fn house_of(&self, human_id: EntityId) -> Option<&House> {
        self.humans
            .get(&human_id)
            .and_then(|h| h.house)
            .and_then(|id| self.houses.get(&id))
    }

    // -----------------------------------------------------------------------
    // Spatial queries
    // -----------------------------------------------------------------------

    /// Positions of every static entity: food, houses, bonfires, resource
    /// nodes and trees.
    pub fn static_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.foods
            .values()
            .map(|f| f.position)
            .chain(self.houses.values().map(|h| h.position))
            .chain(self.bonfires.values().map(|b| b.position))
            .chain(self.resources.values().map(|r| r.position))
            .chain(self.trees.values().map(|t| t.position))
    }

    /// Return `true` if no static entity lies closer than `min_distance`.
    pub fn is_clear(&self, position: Position, min_distance: f64) -> bool {
        !self
            .static_positions()
            .any(|p| p.within(position, min_distance))
    }
}
