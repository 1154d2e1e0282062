//! Validated world mutations requested by agents and by the engine.
//!
//! Every action checks its preconditions before touching anything. A failed
//! precondition leaves the world exactly as it was and comes back as
//! [`ActionOutcome::Rejected`]; stale ids are an ordinary rejection, not an
//! error. Only malformed input (a non-finite position) is a [`SimError`].
//!
//! [`SimError`]: crate::error::SimError

use std::fmt;

use hf_core::{Bonfire, EntityId, FoodKind, House, Human, Material, Position};
use rand::Rng;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::generation::random_name;

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The acting human no longer exists.
    UnknownHuman,
    /// The food, animal, node, tree, house or partner no longer exists.
    UnknownTarget,
    /// The shared inventory cannot cover the cost.
    InsufficientMaterial,
    /// Another entity stands too close to the requested spot.
    Collision,
    /// The house already has an owner.
    AlreadyOwned,
    /// Only adult trees can be felled.
    NotAdult,
    /// A cooldown or hunger precondition is not met.
    NotReady,
    /// A human cannot reproduce with itself.
    SameAgent,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnknownHuman => "unknown human",
            Self::UnknownTarget => "unknown target",
            Self::InsufficientMaterial => "insufficient material",
            Self::Collision => "too close to another entity",
            Self::AlreadyOwned => "house already owned",
            Self::NotAdult => "tree is not adult",
            Self::NotReady => "not ready",
            Self::SameAgent => "same agent",
        };
        write!(f, "{text}")
    }
}

/// Result of an action that did not hit a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action took effect.
    Applied,
    /// The action took effect and created a new entity.
    Created(EntityId),
    /// The action was refused; nothing changed.
    Rejected(Rejection),
}

impl ActionOutcome {
    /// Return `true` unless the action was rejected.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    /// The id of the created entity, if any.
    pub fn created(&self) -> Option<EntityId> {
        match self {
            Self::Created(id) => Some(*id),
            _ => None,
        }
    }
}

fn reject(action: &'static str, actor: EntityId, reason: Rejection) -> ActionOutcome {
    tracing::debug!(action, actor = %actor, %reason, "action rejected");
    ActionOutcome::Rejected(reason)
}

fn human_name(ctx: &SimContext<'_>, id: EntityId) -> String {
    ctx.world
        .human(id)
        .map(|h| h.name.clone())
        .unwrap_or_default()
}

/// Eat from a food source.
///
/// Restores hunger to full and grants 1 xp. An experienced eater may first
/// turn a wild source into a farm. Capacity always drops by one and the
/// source is removed once empty.
pub fn eat(ctx: &mut SimContext<'_>, human_id: EntityId, food_id: EntityId) -> ActionOutcome {
    let Some(xp) = ctx.world.human(human_id).map(|h| h.xp) else {
        return reject("eat", human_id, Rejection::UnknownHuman);
    };
    let Some(kind) = ctx.world.food(food_id).map(|f| f.kind) else {
        return reject("eat", human_id, Rejection::UnknownTarget);
    };

    let eco = &ctx.config.ecology;
    let promote = xp > eco.farm_xp
        && kind == FoodKind::Wild
        && ctx.rng.random_bool(eco.farm_chance.clamp(0.0, 1.0));
    let farm_capacity = eco.farm_capacity;

    if promote {
        if let Some(food) = ctx.world.food_mut(food_id) {
            food.kind = FoodKind::Farm;
            food.capacity = farm_capacity;
        }
        let name = human_name(ctx, human_id);
        ctx.emit(
            SimEventKind::FarmFounded {
                food: food_id,
                by: human_id,
            },
            format!("{name} has created a farm!"),
        );
    }

    let depleted = match ctx.world.food_mut(food_id) {
        Some(food) => {
            food.capacity = food.capacity.saturating_sub(1);
            food.capacity == 0
        }
        None => false,
    };
    if depleted {
        ctx.world.remove_food(food_id);
    }

    if let Some(human) = ctx.world.human_mut(human_id) {
        human.hunger = 100.0;
        human.xp += 1.0;
    }
    ActionOutcome::Applied
}

/// Hunt an animal: it is removed, the hunter is fully fed and gains 2 xp.
pub fn hunt_animal(
    ctx: &mut SimContext<'_>,
    human_id: EntityId,
    animal_id: EntityId,
) -> ActionOutcome {
    if ctx.world.human(human_id).is_none() {
        return reject("hunt", human_id, Rejection::UnknownHuman);
    }
    if ctx.world.remove_animal(animal_id).is_none() {
        return reject("hunt", human_id, Rejection::UnknownTarget);
    }
    ctx.tracking.animals.remove(animal_id);

    if let Some(human) = ctx.world.human_mut(human_id) {
        human.hunger = 100.0;
        human.xp += 2.0;
    }
    ActionOutcome::Applied
}

/// Extract one unit from a resource node into the shared inventory.
pub fn mine_resource(
    ctx: &mut SimContext<'_>,
    human_id: EntityId,
    resource_id: EntityId,
) -> ActionOutcome {
    if ctx.world.human(human_id).is_none() {
        return reject("mine", human_id, Rejection::UnknownHuman);
    }
    let Some(node) = ctx.world.resource_mut(resource_id) else {
        return reject("mine", human_id, Rejection::UnknownTarget);
    };
    node.durability = node.durability.saturating_sub(1);
    let kind = node.kind;
    let exhausted = node.durability == 0;

    ctx.world.inventory.add(kind.material(), 1);
    if let Some(human) = ctx.world.human_mut(human_id) {
        human.hunger -= 1.0;
        human.xp += 0.2;
    }

    if exhausted {
        ctx.world.remove_resource(resource_id);
        let label = match kind.material() {
            Material::Stone => "Stone",
            _ => "Iron",
        };
        ctx.emit(
            SimEventKind::ResourceDepleted {
                resource: resource_id,
                kind,
            },
            format!("{label} vein exhausted."),
        );
    }
    ActionOutcome::Applied
}

/// Fell an adult tree for wood. The tree disappears at once.
pub fn chop_tree(ctx: &mut SimContext<'_>, human_id: EntityId, tree_id: EntityId) -> ActionOutcome {
    if ctx.world.human(human_id).is_none() {
        return reject("chop", human_id, Rejection::UnknownHuman);
    }
    match ctx.world.tree(tree_id) {
        None => return reject("chop", human_id, Rejection::UnknownTarget),
        Some(tree) if !tree.is_adult() => return reject("chop", human_id, Rejection::NotAdult),
        Some(_) => {}
    }

    ctx.world.remove_tree(tree_id);
    let wood = ctx.config.ecology.wood_per_tree;
    ctx.world.inventory.add(Material::Wood, wood);
    if let Some(human) = ctx.world.human_mut(human_id) {
        human.hunger -= 2.0;
        human.xp += 0.5;
    }
    ActionOutcome::Applied
}

/// Found a wooden house owned by `human_id` at `position`.
///
/// Costs wood and hunger; refused if anything static stands within the
/// build clearance. A builder who already owned a house gives it up.
pub fn build_house(
    ctx: &mut SimContext<'_>,
    human_id: EntityId,
    position: Position,
) -> SimResult<ActionOutcome> {
    let position = position.validated()?;
    let Some(previous) = ctx.world.human(human_id).map(|h| h.house) else {
        return Ok(reject("build_house", human_id, Rejection::UnknownHuman));
    };
    let agents = &ctx.config.agents;
    let cost = agents.house_wood_cost;
    let hunger_cost = agents.house_hunger_cost;
    if !ctx.world.inventory.has(Material::Wood, cost) {
        return Ok(reject(
            "build_house",
            human_id,
            Rejection::InsufficientMaterial,
        ));
    }
    if !ctx.world.is_clear(position, agents.build_clearance) {
        return Ok(reject("build_house", human_id, Rejection::Collision));
    }

    let house_id = ctx.world.add_house(House::new(position))?;
    ctx.world.inventory.spend(Material::Wood, cost);
    if let Some(old) = previous.and_then(|id| ctx.world.house_mut(id)) {
        old.owner = None;
    }
    ctx.world.assign_house(human_id, house_id)?;
    if let Some(human) = ctx.world.human_mut(human_id) {
        human.hunger -= hunger_cost;
    }

    let name = human_name(ctx, human_id);
    ctx.emit(
        SimEventKind::HouseBuilt {
            house: house_id,
            owner: human_id,
        },
        format!("{name} has founded a home!"),
    );
    Ok(ActionOutcome::Created(house_id))
}

/// Take ownership of an unowned house.
pub fn claim_house(
    ctx: &mut SimContext<'_>,
    human_id: EntityId,
    house_id: EntityId,
) -> SimResult<ActionOutcome> {
    let Some(previous) = ctx.world.human(human_id).map(|h| h.house) else {
        return Ok(reject("claim_house", human_id, Rejection::UnknownHuman));
    };
    match ctx.world.house(house_id) {
        None => return Ok(reject("claim_house", human_id, Rejection::UnknownTarget)),
        Some(house) if house.owner.is_some() => {
            return Ok(reject("claim_house", human_id, Rejection::AlreadyOwned));
        }
        Some(_) => {}
    }

    if let Some(old) = previous.and_then(|id| ctx.world.house_mut(id)) {
        old.owner = None;
    }
    ctx.world.assign_house(human_id, house_id)?;
    tracing::debug!(human = %human_id, house = %house_id, "house claimed");
    Ok(ActionOutcome::Applied)
}

/// Light a permanent bonfire at `position`, paid from the shared wood.
pub fn build_bonfire(
    ctx: &mut SimContext<'_>,
    position: Position,
    by: Option<EntityId>,
) -> SimResult<ActionOutcome> {
    let position = position.validated()?;
    let cost = ctx.config.ecology.bonfire_wood_cost;
    if !ctx.world.inventory.has(Material::Wood, cost) {
        return Ok(reject(
            "build_bonfire",
            by.unwrap_or(EntityId::UNASSIGNED),
            Rejection::InsufficientMaterial,
        ));
    }

    let bonfire = ctx.world.add_bonfire(Bonfire::new(position))?;
    ctx.world.inventory.spend(Material::Wood, cost);

    let description = match by {
        Some(id) => format!("{} has lit a bonfire!", human_name(ctx, id)),
        None => "A bonfire has been lit!".to_string(),
    };
    ctx.emit(SimEventKind::BonfireLit { bonfire, by }, description);
    Ok(ActionOutcome::Created(bonfire))
}

/// Two ready humans have a child near `location`.
///
/// Both parents need a zero cooldown and enough hunger. Each parent pays
/// hunger and restarts the standard cooldown; the newborn gets an extended
/// one.
pub fn attempt_reproduction(
    ctx: &mut SimContext<'_>,
    parent1: EntityId,
    parent2: EntityId,
    location: Position,
) -> SimResult<ActionOutcome> {
    let location = location.validated()?;
    if parent1 == parent2 {
        return Ok(reject("reproduce", parent1, Rejection::SameAgent));
    }
    let Some(first) = ctx.world.human(parent1) else {
        return Ok(reject("reproduce", parent1, Rejection::UnknownHuman));
    };
    let Some(second) = ctx.world.human(parent2) else {
        return Ok(reject("reproduce", parent1, Rejection::UnknownTarget));
    };

    let eco = &ctx.config.ecology;
    let ready = |h: &Human| h.reproduction_cooldown == 0 && h.hunger >= eco.reproduction_hunger_min;
    if !ready(first) || !ready(second) {
        return Ok(reject("reproduce", parent1, Rejection::NotReady));
    }

    let cooldown = eco.reproduction_cooldown;
    let newborn_cooldown = cooldown + eco.newborn_extra_cooldown;
    let hunger_cost = eco.reproduction_hunger_cost;
    let spread = eco.newborn_offset;
    let limit = ctx.config.map_limit;

    let name = random_name(&mut *ctx.rng);
    let offset = Position::new(
        (ctx.rng.random::<f64>() - 0.5) * spread,
        (ctx.rng.random::<f64>() - 0.5) * spread,
    );
    let birthplace = (location + offset).clamped(limit);

    let child = ctx
        .world
        .add_human(Human::new(name.clone(), birthplace).with_cooldown(newborn_cooldown))?;
    ctx.tracking.humans.set(child, birthplace);

    for parent in [parent1, parent2] {
        if let Some(h) = ctx.world.human_mut(parent) {
            h.reproduction_cooldown = cooldown;
            h.hunger -= hunger_cost;
        }
    }

    ctx.emit(
        SimEventKind::Birth {
            child,
            parents: [parent1, parent2],
        },
        format!("{name} has been born!"),
    );
    Ok(ActionOutcome::Created(child))
}
