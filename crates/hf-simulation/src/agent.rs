//! Per-human decision making.
//!
//! Every tick each human re-derives what it wants from scratch by walking a
//! fixed priority list: survive, leave the spot of a recent birth, find
//! shelter, reproduce, work, go home, and finally wander. The first need that
//! yields something to do wins. The only state carried between ticks lives in
//! [`AgentMemory`].
//!
//! Humans are processed one at a time in ascending id order, and each one
//! sees what earlier humans did in the same tick. A house claimed by a lower
//! id is therefore no longer vacant for a higher id.

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::fmt;

use hf_core::{EntityId, Human, Material, Position, World};
use rand::Rng;
use serde::Serialize;

use crate::actions::{self, ActionOutcome};
use crate::config::{AgentConfig, SimConfig};
use crate::context::SimContext;
use crate::error::SimResult;
use crate::spatial::{Nearest, Tracking, nearest};
use crate::steering::{Mover, steer};
use crate::system::System;

/// Close enough to a wander or flee point to count as arrived.
const ARRIVED: f64 = 0.5;

/// What is currently driving a human. Reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    SeekingFood,
    Hunting,
    SeekingMate,
    GoingHome,
    Building,
    Mining,
    Lumberjacking,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::SeekingFood => "seeking food",
            Self::Hunting => "hunting",
            Self::SeekingMate => "seeking mate",
            Self::GoingHome => "going home",
            Self::Building => "building",
            Self::Mining => "mining",
            Self::Lumberjacking => "lumberjacking",
        };
        write!(f, "{label}")
    }
}

/// A world mutation a human wants to perform this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Eat(EntityId),
    Hunt(EntityId),
    Mine(EntityId),
    Chop(EntityId),
    BuildHouse(Position),
    ClaimHouse(EntityId),
    Reproduce { partner: EntityId, at: Position },
}

/// The outcome of one evaluation of a human's needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub mode: Mode,
    /// Where to walk. `None` means stand still.
    pub target: Option<Position>,
    pub intent: Option<Intent>,
    /// Speed multiplier for this mode.
    pub boost: f64,
    /// The house being walked into, which must not push the walker away.
    pub heading_to: Option<EntityId>,
    /// Arrived: drop any leftover velocity instead of coasting.
    pub halted: bool,
}

impl Decision {
    fn idle() -> Self {
        Self {
            mode: Mode::Idle,
            target: None,
            intent: None,
            boost: 1.0,
            heading_to: None,
            halted: false,
        }
    }

    fn toward(mode: Mode, target: Position) -> Self {
        Self {
            mode,
            target: Some(target),
            ..Self::idle()
        }
    }

    fn halt(mode: Mode, intent: Option<Intent>) -> Self {
        Self {
            mode,
            intent,
            halted: true,
            ..Self::idle()
        }
    }

    fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    fn heading_to(mut self, house: EntityId) -> Self {
        self.heading_to = Some(house);
        self
    }
}

/// Cross-tick scratch state of one human.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentMemory {
    /// Logical seconds spent motionless with nothing to do.
    pub idle_timer: f64,
    /// How long to stay idle before wandering off.
    pub wait_time: f64,
    pub wander_target: Option<Position>,
    /// Smoothed velocity, world units per wall second.
    pub velocity: Position,
    /// Whether the last steering step changed position.
    pub moving: bool,
    /// Where to walk after becoming a parent.
    pub flee_target: Option<Position>,
    last_cooldown: u32,
}

impl AgentMemory {
    fn new<R: Rng + ?Sized>(cooldown: u32, agents: &AgentConfig, rng: &mut R) -> Self {
        Self {
            idle_timer: 0.0,
            wait_time: random_wait(agents, rng),
            wander_target: None,
            velocity: Position::ORIGIN,
            moving: false,
            flee_target: None,
            last_cooldown: cooldown,
        }
    }

    /// Track the reproduction cooldown and pick a flee point when it jumps
    /// from zero, which only happens on becoming a parent.
    fn note_cooldown<R: Rng + ?Sized>(
        &mut self,
        cooldown: u32,
        position: Position,
        config: &SimConfig,
        rng: &mut R,
    ) {
        if self.last_cooldown == 0 && cooldown > 0 {
            let angle = rng.random_range(0.0..TAU);
            let away = Position::new(angle.cos(), angle.sin()) * config.agents.flee_distance;
            self.flee_target = Some((position + away).clamped(config.map_limit));
            self.wander_target = None;
        }
        self.last_cooldown = cooldown;
    }
}

fn random_wait<R: Rng + ?Sized>(agents: &AgentConfig, rng: &mut R) -> f64 {
    if agents.idle_wait_max > agents.idle_wait_min {
        rng.random_range(agents.idle_wait_min..agents.idle_wait_max)
    } else {
        agents.idle_wait_min
    }
}

/// Read-only view of the world used while deciding.
#[derive(Debug, Clone, Copy)]
pub struct Perception<'a> {
    pub world: &'a World,
    pub tracking: &'a Tracking,
    pub config: &'a SimConfig,
}

impl Perception<'_> {
    fn agents(&self) -> &AgentConfig {
        &self.config.agents
    }

    fn home(&self, human: &Human) -> Option<Position> {
        human
            .house
            .and_then(|id| self.world.house(id))
            .map(|h| h.position)
    }

    fn animals(&self) -> impl Iterator<Item = (EntityId, Position)> + '_ {
        self.world
            .animals()
            .map(|a| (a.id, self.tracking.animals.get_or(a.id, a.position)))
    }

    fn humans(&self) -> impl Iterator<Item = &Human> + '_ {
        self.world.humans()
    }

    fn human_position(&self, human: &Human) -> Position {
        self.tracking.humans.get_or(human.id, human.position)
    }

    /// Chance that one tick of work at the action spot succeeds.
    ///
    /// The rate is per wall second at 1x; a tick spans `tick_rate / speed`
    /// wall seconds at `speed`, so the multiplier cancels out per tick.
    fn work_success(&self, xp: f64) -> f64 {
        let agents = self.agents();
        let rate = agents.work_rate + xp * agents.work_rate_per_xp;
        (rate * self.config.scheduler.tick_rate).clamp(0.0, 1.0)
    }
}

/// Nearest candidate within `radius` of `home`, or the nearest overall if
/// there is no home or nothing lies near it.
fn nearest_preferring_home(
    from: Position,
    home: Option<Position>,
    radius: f64,
    candidates: impl IntoIterator<Item = (EntityId, Position)>,
) -> Option<Nearest> {
    let candidates: Vec<(EntityId, Position)> = candidates.into_iter().collect();
    if let Some(home) = home {
        let near_home = nearest(
            from,
            candidates.iter().copied().filter(|(_, p)| p.within(home, radius)),
            None,
        );
        if near_home.is_some() {
            return near_home;
        }
    }
    nearest(from, candidates, None)
}

/// Evaluate the needs of `human`, standing at `position`, for this tick.
pub fn decide<R: Rng + ?Sized>(
    human: &Human,
    position: Position,
    view: &Perception<'_>,
    memory: &mut AgentMemory,
    rng: &mut R,
) -> Decision {
    let chosen = survival(human, position, view)
        .or_else(|| flee(position, memory))
        .or_else(|| shelter(human, position, view, rng))
        .or_else(|| reproduction(human, position, view, rng))
        .or_else(|| work(human, position, view, rng))
        .or_else(|| go_home(human, position, view));

    match chosen {
        Some(decision) => {
            memory.wander_target = None;
            memory.idle_timer = 0.0;
            decision
        }
        None => wander(human, position, view, memory, rng),
    }
}

fn survival(human: &Human, position: Position, view: &Perception<'_>) -> Option<Decision> {
    let agents = view.agents();
    let hungry = human.hunger < agents.seek_food_hunger
        || (human.house.is_none() && human.hunger < agents.homeless_seek_food_hunger);
    if !hungry {
        return None;
    }
    let starving = human.hunger < agents.critical_hunger;
    let boost = if starving { agents.starving_boost } else { 1.0 };

    if let Some(prey) = nearest(position, view.animals(), Some(agents.vision_radius)) {
        if prey.distance < agents.hunt_distance {
            return Some(Decision::halt(Mode::Hunting, Some(Intent::Hunt(prey.id))));
        }
        return Some(
            Decision::toward(Mode::Hunting, prey.position).with_boost(boost.max(agents.hunt_boost)),
        );
    }

    let foods = view.world.foods().map(|f| (f.id, f.position));
    let food = if human.hunger > agents.critical_hunger {
        nearest_preferring_home(position, view.home(human), agents.home_radius, foods)
    } else {
        nearest(position, foods, None)
    };
    let food = food?;

    if food.distance < agents.eat_distance {
        Some(Decision::halt(Mode::SeekingFood, Some(Intent::Eat(food.id))))
    } else {
        Some(Decision::toward(Mode::SeekingFood, food.position).with_boost(boost))
    }
}

fn flee(position: Position, memory: &mut AgentMemory) -> Option<Decision> {
    let target = memory.flee_target?;
    if target.within(position, ARRIVED) {
        memory.flee_target = None;
        return None;
    }
    Some(Decision::toward(Mode::Idle, target))
}

fn shelter<R: Rng + ?Sized>(
    human: &Human,
    position: Position,
    view: &Perception<'_>,
    rng: &mut R,
) -> Option<Decision> {
    if human.house.is_some() {
        return None;
    }
    let agents = view.agents();

    let vacant = view
        .world
        .houses()
        .filter(|h| h.owner.is_none())
        .map(|h| (h.id, h.position));
    if let Some(house) = nearest(position, vacant, Some(agents.claim_radius)) {
        let decision = if house.distance < agents.claim_distance {
            Decision::halt(Mode::GoingHome, Some(Intent::ClaimHouse(house.id)))
        } else {
            Decision::toward(Mode::GoingHome, house.position)
        };
        return Some(decision.heading_to(house.id));
    }

    let can_build = human.hunger > agents.build_hunger
        && view
            .world
            .inventory
            .has(Material::Wood, agents.house_wood_cost);
    if can_build && rng.random_bool(agents.build_chance.clamp(0.0, 1.0)) {
        let reach = agents.build_clearance;
        let offset = Position::new(
            rng.random_range(-reach..=reach),
            rng.random_range(-reach..=reach),
        );
        let site = (position + offset).clamped(view.config.map_limit);
        return Some(Decision::halt(Mode::Building, Some(Intent::BuildHouse(site))));
    }
    None
}

fn reproduction<R: Rng + ?Sized>(
    human: &Human,
    position: Position,
    view: &Perception<'_>,
    rng: &mut R,
) -> Option<Decision> {
    let agents = view.agents();
    let eligible = human.hunger > agents.love_hunger
        && human.age > agents.maturity_age
        && human.reproduction_cooldown == 0
        && (!agents.reproduction_requires_house || human.house.is_some());
    if !eligible {
        return None;
    }

    let candidates = view
        .humans()
        .filter(|h| {
            h.id != human.id && h.age > agents.maturity_age && h.reproduction_cooldown == 0
        })
        .map(|h| (h.id, view.human_position(h)));
    let partner = nearest(position, candidates, None)?;

    if partner.distance < agents.loving_distance {
        let intent = rng
            .random_bool(agents.reproduction_chance.clamp(0.0, 1.0))
            .then_some(Intent::Reproduce {
                partner: partner.id,
                at: (position + partner.position) * 0.5,
            });
        return Some(Decision::halt(Mode::SeekingMate, intent));
    }
    Some(Decision::toward(Mode::SeekingMate, partner.position).with_boost(agents.mate_boost))
}

fn work<R: Rng + ?Sized>(
    human: &Human,
    position: Position,
    view: &Perception<'_>,
    rng: &mut R,
) -> Option<Decision> {
    let agents = view.agents();
    if human.hunger <= agents.work_hunger {
        return None;
    }
    let home = view.home(human);

    let wood_low = !view.world.inventory.has(Material::Wood, agents.low_wood);
    let tree = if wood_low {
        let adults = view
            .world
            .trees()
            .filter(|t| t.is_adult())
            .map(|t| (t.id, t.position));
        nearest_preferring_home(position, home, agents.home_radius, adults)
    } else {
        None
    };
    let (mode, spot) = match tree {
        Some(tree) => (Mode::Lumberjacking, tree),
        None => {
            let nodes = view.world.resources().map(|r| (r.id, r.position));
            let node = nearest_preferring_home(position, home, agents.home_radius, nodes)?;
            (Mode::Mining, node)
        }
    };

    if spot.distance >= agents.action_distance {
        return Some(Decision::toward(mode, spot.position));
    }
    let intent = match mode {
        Mode::Lumberjacking => Intent::Chop(spot.id),
        _ => Intent::Mine(spot.id),
    };
    let success = rng.random_bool(view.work_success(human.xp));
    Some(Decision::halt(mode, success.then_some(intent)))
}

fn go_home(human: &Human, position: Position, view: &Perception<'_>) -> Option<Decision> {
    let house = human.house.and_then(|id| view.world.house(id))?;
    if house.position.within(position, view.agents().home_threshold) {
        return None;
    }
    Some(Decision::toward(Mode::GoingHome, house.position).heading_to(house.id))
}

fn wander<R: Rng + ?Sized>(
    human: &Human,
    position: Position,
    view: &Perception<'_>,
    memory: &mut AgentMemory,
    rng: &mut R,
) -> Decision {
    if let Some(target) = memory.wander_target {
        if !target.within(position, ARRIVED) {
            return Decision::toward(Mode::Idle, target);
        }
        memory.wander_target = None;
    }
    if memory.moving {
        return Decision::idle();
    }

    memory.idle_timer += view.config.scheduler.tick_rate;
    if memory.idle_timer <= memory.wait_time {
        return Decision::idle();
    }

    let agents = view.agents();
    memory.idle_timer = 0.0;
    memory.wait_time = random_wait(agents, rng);

    let point = match view.home(human) {
        Some(home) => {
            let radius = agents.home_threshold * 0.8 * rng.random::<f64>();
            let angle = rng.random_range(0.0..TAU);
            home + Position::new(angle.cos(), angle.sin()) * radius
        }
        None => {
            let range = agents.wander_range;
            position
                + Position::new(
                    rng.random_range(-range..=range),
                    rng.random_range(-range..=range),
                )
        }
    }
    .clamped(view.config.map_limit);

    memory.wander_target = Some(point);
    Decision::toward(Mode::Idle, point)
}

fn apply_intent(
    ctx: &mut SimContext<'_>,
    human: EntityId,
    intent: Intent,
) -> SimResult<ActionOutcome> {
    let outcome = match intent {
        Intent::Eat(food) => actions::eat(ctx, human, food),
        Intent::Hunt(animal) => actions::hunt_animal(ctx, human, animal),
        Intent::Mine(node) => actions::mine_resource(ctx, human, node),
        Intent::Chop(tree) => actions::chop_tree(ctx, human, tree),
        Intent::BuildHouse(site) => actions::build_house(ctx, human, site)?,
        Intent::ClaimHouse(house) => actions::claim_house(ctx, human, house)?,
        Intent::Reproduce { partner, at } => {
            actions::attempt_reproduction(ctx, human, partner, at)?
        }
    };
    Ok(outcome)
}

/// Runs the decision engine and movement for every human.
#[derive(Debug, Default)]
pub struct AgentSystem {
    memory: BTreeMap<EntityId, AgentMemory>,
    modes: BTreeMap<EntityId, Mode>,
}

impl AgentSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mode a human was in after the last tick.
    pub fn mode(&self, id: EntityId) -> Option<Mode> {
        self.modes.get(&id).copied()
    }
}

impl System for AgentSystem {
    fn name(&self) -> &str {
        "agents"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let world = &*ctx.world;
        self.memory.retain(|id, _| world.human(*id).is_some());
        self.modes.retain(|id, _| world.human(*id).is_some());

        for id in ctx.world.human_ids() {
            let Some(human) = ctx.world.human(id).cloned() else {
                continue;
            };
            let position = ctx.tracking.humans.get_or(id, human.position);
            let memory = self.memory.entry(id).or_insert_with(|| {
                AgentMemory::new(human.reproduction_cooldown, &ctx.config.agents, &mut *ctx.rng)
            });
            memory.note_cooldown(human.reproduction_cooldown, position, ctx.config, &mut *ctx.rng);

            let view = Perception {
                world: ctx.world,
                tracking: ctx.tracking,
                config: ctx.config,
            };
            let decision = decide(&human, position, &view, memory, &mut *ctx.rng);
            tracing::trace!(human = %id, mode = %decision.mode, "decided");

            if let Some(intent) = decision.intent {
                let outcome = apply_intent(ctx, id, intent)?;
                tracing::trace!(human = %id, ?intent, ?outcome, "intent applied");
            }

            let Some(human) = ctx.world.human(id) else {
                continue;
            };
            if decision.halted {
                memory.velocity = Position::ORIGIN;
            }
            let mover = Mover {
                id,
                position,
                velocity: memory.velocity,
                target: decision.target,
                boost: decision.boost,
                passable: [human.house, decision.heading_to],
            };
            let cooldown = human.reproduction_cooldown;
            let others = ctx
                .world
                .humans()
                .filter(|h| h.id != id)
                .map(|h| ctx.tracking.humans.get_or(h.id, h.position));
            let houses = ctx.world.houses().map(|h| (h.id, h.position));
            let motion = steer(&mover, others, houses, ctx.config, ctx.speed);

            memory.velocity = motion.velocity;
            memory.moving = motion.moved_from(position);
            memory.note_cooldown(cooldown, motion.position, ctx.config, &mut *ctx.rng);
            ctx.tracking.humans.set(id, motion.position);
            if let Some(human) = ctx.world.human_mut(id) {
                human.position = motion.position;
            }
            self.modes.insert(id, decision.mode);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;
    use hf_core::{Animal, AnimalKind, FoodSource, House, ResourceKind, ResourceNode, Tree, TreeStage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Scene {
        world: World,
        tracking: Tracking,
        config: SimConfig,
        rng: StdRng,
    }

    impl Scene {
        fn new() -> Self {
            Self {
                world: World::new(),
                tracking: Tracking::new(),
                config: SimConfig::default(),
                rng: StdRng::seed_from_u64(21),
            }
        }

        fn human(&mut self, human: Human) -> EntityId {
            self.world.add_human(human).unwrap()
        }

        fn housed(&mut self, human: Human, at: Position) -> EntityId {
            let id = self.human(human);
            let house = self.world.add_house(House::new(at)).unwrap();
            self.world.assign_house(id, house).unwrap();
            id
        }

        fn decide(&mut self, id: EntityId) -> Decision {
            let mut memory = AgentMemory::new(0, &self.config.agents, &mut self.rng);
            self.decide_with(id, &mut memory)
        }

        fn decide_with(&mut self, id: EntityId, memory: &mut AgentMemory) -> Decision {
            let human = self.world.human(id).unwrap().clone();
            let view = Perception {
                world: &self.world,
                tracking: &self.tracking,
                config: &self.config,
            };
            decide(&human, human.position, &view, memory, &mut self.rng)
        }
    }

    fn adult(name: &str, x: f64, z: f64) -> Human {
        Human::new(name, Position::new(x, z)).with_age(20.0)
    }

    #[test]
    fn hungry_human_picks_near_food_over_far_rock() {
        let mut scene = Scene::new();
        let id = scene.human(adult("Leo", 0.0, 0.0).with_hunger(39.0));
        scene
            .world
            .add_resource(ResourceNode::new(
                ResourceKind::Rock,
                Position::new(100.0, 0.0),
                20,
            ))
            .unwrap();
        let food = Position::new(2.0, 0.0);
        scene.world.add_food(FoodSource::wild(food)).unwrap();

        let decision = scene.decide(id);
        assert_eq!(decision.mode, Mode::SeekingFood);
        assert_eq!(decision.target, Some(food));
    }

    #[test]
    fn eats_when_in_reach() {
        let mut scene = Scene::new();
        let id = scene.human(adult("Ava", 0.0, 0.0).with_hunger(10.0));
        let food = scene
            .world
            .add_food(FoodSource::wild(Position::new(0.5, 0.0)))
            .unwrap();

        let decision = scene.decide(id);
        assert_eq!(decision.intent, Some(Intent::Eat(food)));
        assert!(decision.target.is_none());
        assert!(decision.halted);
    }

    #[test]
    fn hunting_beats_foraging() {
        let mut scene = Scene::new();
        let id = scene.human(adult("Kai", 0.0, 0.0).with_hunger(30.0));
        scene
            .world
            .add_food(FoodSource::wild(Position::new(1.5, 0.0)))
            .unwrap();
        scene
            .world
            .add_animal(Animal::new(AnimalKind::Chicken, Position::new(20.0, 0.0)))
            .unwrap();

        let decision = scene.decide(id);
        assert_eq!(decision.mode, Mode::Hunting);
        assert!(decision.boost > 1.0);
    }

    #[test]
    fn critical_hunger_drops_home_preference() {
        let mut scene = Scene::new();
        let id = scene.housed(adult("Sol", 50.0, 0.0).with_hunger(30.0), Position::ORIGIN);
        let near_home = Position::new(25.0, 0.0);
        let near_me = Position::new(55.0, 0.0);
        scene.world.add_food(FoodSource::wild(near_home)).unwrap();
        scene.world.add_food(FoodSource::wild(near_me)).unwrap();

        assert_eq!(scene.decide(id).target, Some(near_home));

        scene.world.human_mut(id).unwrap().hunger = 10.0;
        assert_eq!(scene.decide(id).target, Some(near_me));
    }

    #[test]
    fn homeless_human_claims_vacant_house() {
        let mut scene = Scene::new();
        let id = scene.human(adult("Iris", 0.0, 0.0));
        let far = scene
            .world
            .add_house(House::new(Position::new(10.0, 0.0)))
            .unwrap();

        let decision = scene.decide(id);
        assert_eq!(decision.mode, Mode::GoingHome);
        assert_eq!(decision.heading_to, Some(far));

        scene.world.human_mut(id).unwrap().position = Position::new(9.0, 0.0);
        assert_eq!(scene.decide(id).intent, Some(Intent::ClaimHouse(far)));
    }

    #[test]
    fn builds_when_wood_allows() {
        let mut scene = Scene::new();
        scene.config.agents.build_chance = 1.0;
        scene.world.inventory.add(Material::Wood, 10);
        let id = scene.human(adult("Max", 0.0, 0.0));

        let decision = scene.decide(id);
        assert_eq!(decision.mode, Mode::Building);
        assert!(matches!(decision.intent, Some(Intent::BuildHouse(_))));
    }

    #[test]
    fn housed_adults_seek_each_other() {
        let mut scene = Scene::new();
        let a = scene.housed(adult("Adán", -10.0, 0.0), Position::new(-10.0, 0.0));
        scene.housed(adult("Eva", 10.0, 0.0), Position::new(10.0, 0.0));

        let decision = scene.decide(a);
        assert_eq!(decision.mode, Mode::SeekingMate);
        assert_eq!(decision.target, Some(Position::new(10.0, 0.0)));
    }

    #[test]
    fn homeless_adults_do_not_court_when_a_house_is_required() {
        let mut scene = Scene::new();
        let a = scene.human(adult("Abel", 0.0, 0.0).with_cooldown(0));
        scene.human(adult("Nora", 5.0, 0.0));
        assert_ne!(scene.decide(a).mode, Mode::SeekingMate);

        scene.config.agents.reproduction_requires_house = false;
        assert_eq!(scene.decide(a).mode, Mode::SeekingMate);
    }

    #[test]
    fn worker_chops_when_wood_is_low_and_mines_otherwise() {
        let mut scene = Scene::new();
        let id = scene.housed(adult("Hugo", 0.0, 0.0).with_cooldown(40), Position::ORIGIN);
        scene
            .world
            .add_tree(Tree::new(TreeStage::Adult, Position::new(6.0, 0.0)))
            .unwrap();
        scene
            .world
            .add_resource(ResourceNode::new(
                ResourceKind::Rock,
                Position::new(0.0, 4.0),
                20,
            ))
            .unwrap();

        let decision = scene.decide(id);
        assert_eq!(decision.mode, Mode::Lumberjacking);
        assert_eq!(decision.target, Some(Position::new(6.0, 0.0)));

        scene.world.inventory.add(Material::Wood, 50);
        let decision = scene.decide(id);
        assert_eq!(decision.mode, Mode::Mining);
        assert_eq!(decision.target, Some(Position::new(0.0, 4.0)));
    }

    #[test]
    fn expert_worker_always_succeeds_in_reach() {
        let mut scene = Scene::new();
        let id = scene.housed(
            adult("Alma", 0.0, 0.0).with_cooldown(40).with_xp(100.0),
            Position::ORIGIN,
        );
        scene.world.inventory.add(Material::Wood, 50);
        let node = scene
            .world
            .add_resource(ResourceNode::new(
                ResourceKind::Iron,
                Position::new(1.0, 0.0),
                30,
            ))
            .unwrap();

        let decision = scene.decide(id);
        assert_eq!(decision.intent, Some(Intent::Mine(node)));
    }

    #[test]
    fn work_chance_is_rate_per_tick() {
        let scene = Scene::new();
        let view = Perception {
            world: &scene.world,
            tracking: &scene.tracking,
            config: &scene.config,
        };
        assert!((view.work_success(0.0) - 0.1).abs() < 1e-9);
        assert!((view.work_success(5.0) - 0.15).abs() < 1e-9);
        assert!((view.work_success(100.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn goes_home_when_nothing_else_to_do() {
        let mut scene = Scene::new();
        let id = scene.housed(adult("Río", 0.0, 0.0).with_cooldown(40), Position::new(10.0, 0.0));

        let decision = scene.decide(id);
        assert_eq!(decision.mode, Mode::GoingHome);
        assert_eq!(decision.target, Some(Position::new(10.0, 0.0)));
        assert!(decision.heading_to.is_some());
    }

    #[test]
    fn idle_human_wanders_after_waiting() {
        let mut scene = Scene::new();
        let id = scene.human(adult("Luna", 0.0, 0.0).with_cooldown(40));
        let mut memory = AgentMemory::new(40, &scene.config.agents, &mut scene.rng);

        let first = scene.decide_with(id, &mut memory);
        assert_eq!(first, Decision::idle());

        let mut wander = None;
        for _ in 0..30 {
            let decision = scene.decide_with(id, &mut memory);
            if decision.target.is_some() {
                wander = decision.target;
                break;
            }
        }
        let point = wander.unwrap();
        assert!(point.x.abs() <= 8.0 && point.z.abs() <= 8.0);
        assert_eq!(memory.wander_target, Some(point));
    }

    #[test]
    fn new_parent_walks_away() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut memory = AgentMemory::new(0, &config.agents, &mut rng);

        memory.note_cooldown(40, Position::ORIGIN, &config, &mut rng);
        let flee = memory.flee_target.unwrap();
        assert!((flee.length() - config.agents.flee_distance).abs() < 1e-9);

        // Counting down does not trigger again.
        memory.flee_target = None;
        memory.note_cooldown(39, Position::ORIGIN, &config, &mut rng);
        assert!(memory.flee_target.is_none());
    }

    #[test]
    fn system_moves_humans_and_records_modes() {
        let mut world = World::new();
        let id = world
            .add_human(adult("Zoe", 0.0, 0.0).with_hunger(30.0))
            .unwrap();
        world
            .add_food(FoodSource::wild(Position::new(10.0, 0.0)))
            .unwrap();
        let mut tracking = Tracking::new();
        tracking.seed_from(&world);
        let mut events = EventLog::new(10);
        let mut rng = StdRng::seed_from_u64(4);
        let config = SimConfig::default();

        let mut system = AgentSystem::new();
        for _ in 0..3 {
            let mut ctx = SimContext {
                world: &mut world,
                tracking: &mut tracking,
                events: &mut events,
                rng: &mut rng,
                config: &config,
                speed: 1.0,
            };
            system.tick(&mut ctx).unwrap();
        }

        assert_eq!(system.mode(id), Some(Mode::SeekingFood));
        let moved = tracking.humans.get(id).unwrap();
        assert!(moved.x > 0.0);
        assert_eq!(world.human(id).unwrap().position, moved);
    }

    #[test]
    fn eating_stops_the_walker_dead() {
        let mut world = World::new();
        let id = world
            .add_human(adult("Lía", 0.0, 0.0).with_hunger(10.0))
            .unwrap();
        world
            .add_food(FoodSource::wild(Position::new(0.5, 0.0)))
            .unwrap();
        let mut tracking = Tracking::new();
        tracking.seed_from(&world);
        let mut events = EventLog::new(10);
        let mut rng = StdRng::seed_from_u64(5);
        let config = SimConfig::default();

        let mut system = AgentSystem::new();
        let mut memory = AgentMemory::new(0, &config.agents, &mut rng);
        memory.velocity = Position::new(2.0, 0.0);
        system.memory.insert(id, memory);

        let mut ctx = SimContext {
            world: &mut world,
            tracking: &mut tracking,
            events: &mut events,
            rng: &mut rng,
            config: &config,
            speed: 1.0,
        };
        system.tick(&mut ctx).unwrap();

        assert!((world.human(id).unwrap().hunger - 100.0).abs() < f64::EPSILON);
        assert_eq!(world.human(id).unwrap().position, Position::ORIGIN);
        assert_eq!(system.memory[&id].velocity, Position::ORIGIN);
    }

    #[test]
    fn second_claim_in_same_tick_is_refused() {
        let mut world = World::new();
        let first = world.add_human(adult("Caín", 0.0, 0.0)).unwrap();
        let second = world.add_human(adult("Abel", 0.5, 0.0)).unwrap();
        let house = world
            .add_house(House::new(Position::new(0.0, 1.0)))
            .unwrap();
        let mut tracking = Tracking::new();
        tracking.seed_from(&world);
        let mut events = EventLog::new(10);
        let mut rng = StdRng::seed_from_u64(8);
        let config = SimConfig::default();

        let mut ctx = SimContext {
            world: &mut world,
            tracking: &mut tracking,
            events: &mut events,
            rng: &mut rng,
            config: &config,
            speed: 1.0,
        };
        AgentSystem::new().tick(&mut ctx).unwrap();

        assert_eq!(world.house(house).unwrap().owner, Some(first));
        assert!(world.human(second).unwrap().house.is_none());
    }
}
