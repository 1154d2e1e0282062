use hf_core::{Animal, EntityId, FoodSource, Material, Position, Tree, TreeStage};
use rand::Rng;

use crate::actions;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::generation::random_position;
use crate::needs::{Shelter, hunger_decay};
use crate::system::System;

/// Advances everything that is not an agent decision.
///
/// Each tick, in order: hunger decay and bonfire invention, aging and
/// cooldowns, starvation, food respawn, tree growth and seeding, animal
/// wandering and breeding, and house upgrades. Every probabilistic step rolls
/// independently.
#[derive(Debug, Default)]
pub struct EcosystemSystem {
    deaths: u64,
    births: u64,
}

impl EcosystemSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Humans that have starved since the simulation started.
    pub fn deaths(&self) -> u64 {
        self.deaths
    }

    /// Animals born since the simulation started.
    pub fn animal_births(&self) -> u64 {
        self.births
    }

    fn metabolize(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let is_night = ctx.world.calendar.is_night();

        for id in ctx.world.human_ids() {
            let Some(human) = ctx.world.human(id) else {
                continue;
            };
            let config = ctx.config;
            let eco = &config.ecology;
            let position = ctx.tracking.humans.get_or(id, human.position);
            let shelter = Shelter::of(ctx.world, human, position, eco);
            let decay = hunger_decay(eco, shelter, is_night);

            let inventive = is_night
                && !shelter.is_protected()
                && human.xp > eco.bonfire_xp
                && ctx.world.inventory.has(Material::Wood, eco.bonfire_wood_cost)
                && !ctx
                    .world
                    .bonfires()
                    .any(|b| b.position.within(position, eco.bonfire_spacing));
            if inventive && ctx.rng.random_bool(eco.bonfire_chance.clamp(0.0, 1.0)) {
                actions::build_bonfire(ctx, position, Some(id))?;
            }

            let aging = ctx.config.ecology.aging_per_tick;
            if let Some(human) = ctx.world.human_mut(id) {
                human.hunger -= decay;
                human.age += aging;
                human.reproduction_cooldown = human.reproduction_cooldown.saturating_sub(1);
            }
        }
        Ok(())
    }

    fn bury_the_starved(&mut self, ctx: &mut SimContext<'_>) {
        let starved: Vec<EntityId> = ctx
            .world
            .humans()
            .filter(|h| h.is_starved())
            .map(|h| h.id)
            .collect();

        for id in starved {
            let Some(human) = ctx.world.remove_human(id) else {
                continue;
            };
            ctx.tracking.humans.remove(id);
            self.deaths += 1;
            ctx.emit(
                SimEventKind::Death {
                    entity: id,
                    xp: human.xp,
                },
                format!("{} has died. XP: {:.1}", human.name, human.xp),
            );
        }
    }

    fn spawn_food(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let eco = &ctx.config.ecology;
        if ctx.world.food_count() < eco.max_food
            && ctx.rng.random_bool(eco.food_spawn_chance.clamp(0.0, 1.0))
        {
            let position = random_position(&mut *ctx.rng, ctx.config.map_limit);
            ctx.world.add_food(FoodSource::wild(position))?;
        }
        Ok(())
    }

    fn grow_trees(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let eco = &ctx.config.ecology;
        let limit = ctx.config.map_limit;
        let mut seedlings = Vec::new();
        let mut population = ctx.world.tree_count();

        for tree in ctx.world.trees_mut() {
            match tree.stage.next() {
                Some(next) => {
                    tree.growth += eco.tree_growth_per_tick;
                    if tree.growth >= 1.0 {
                        tree.stage = next;
                        tree.growth = 0.0;
                    }
                }
                None => {
                    if population < eco.max_trees
                        && ctx.rng.random_bool(eco.tree_seed_chance.clamp(0.0, 1.0))
                    {
                        let reach = eco.tree_seed_offset;
                        let offset = Position::new(
                            ctx.rng.random_range(-reach..=reach),
                            ctx.rng.random_range(-reach..=reach),
                        );
                        seedlings.push((tree.position + offset).clamped(limit));
                        population += 1;
                    }
                }
            }
        }

        for position in seedlings {
            ctx.world.add_tree(Tree::new(TreeStage::Sapling, position))?;
        }
        Ok(())
    }

    fn roam_animals(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let eco = &ctx.config.ecology;
        let limit = ctx.config.map_limit;

        for id in ctx.world.animal_ids() {
            let Some(animal) = ctx.world.animal(id) else {
                continue;
            };
            let from = ctx.tracking.animals.get_or(id, animal.position);
            let step = eco.animal_step;
            let to = (from
                + Position::new(
                    ctx.rng.random_range(-step..=step),
                    ctx.rng.random_range(-step..=step),
                ))
            .clamped(limit);
            ctx.tracking.animals.set(id, to);
            if let Some(animal) = ctx.world.animal_mut(id) {
                animal.position = to;
                animal.age += eco.aging_per_tick;
                animal.reproduction_cooldown = animal.reproduction_cooldown.saturating_sub(1);
            }
        }

        let mut population = ctx.world.animal_count();
        let mut litters = Vec::new();
        let mut paired: Vec<EntityId> = Vec::new();
        for animal in ctx.world.animals() {
            if population >= eco.max_animals {
                break;
            }
            if animal.reproduction_cooldown > 0 || paired.contains(&animal.id) {
                continue;
            }
            let mate = ctx
                .world
                .animals()
                .filter(|other| {
                    other.id != animal.id
                        && other.kind == animal.kind
                        && other.reproduction_cooldown == 0
                        && !paired.contains(&other.id)
                })
                .find(|other| other.position.within(animal.position, eco.animal_mating_range));
            let Some(mate) = mate else {
                continue;
            };
            if !ctx
                .rng
                .random_bool(eco.animal_reproduction_chance.clamp(0.0, 1.0))
            {
                continue;
            }
            paired.extend([animal.id, mate.id]);
            litters.push((animal.kind, (animal.position + mate.position) * 0.5));
            population += 1;
        }

        for id in &paired {
            if let Some(parent) = ctx.world.animal_mut(*id) {
                parent.reproduction_cooldown = eco.animal_cooldown;
            }
        }
        for (kind, position) in litters {
            let mut young = Animal::new(kind, position);
            young.reproduction_cooldown = eco.animal_cooldown;
            let id = ctx.world.add_animal(young)?;
            ctx.tracking.animals.set(id, position);
            self.births += 1;
            tracing::debug!(animal = %id, %kind, "animal born");
        }
        Ok(())
    }

    fn upgrade_house(&mut self, ctx: &mut SimContext<'_>) {
        let eco = &ctx.config.ecology;
        let inventory = ctx.world.inventory;
        let candidate = ctx.world.houses().find_map(|house| {
            house
                .level
                .upgrade()
                .filter(|(_, material)| inventory.has(*material, eco.upgrade_cost))
                .map(|(level, material)| (house.id, level, material))
        });
        let Some((house_id, level, material)) = candidate else {
            return;
        };
        if !ctx.rng.random_bool(eco.upgrade_chance.clamp(0.0, 1.0)) {
            return;
        }
        if !ctx.world.inventory.spend(material, eco.upgrade_cost) {
            return;
        }
        if let Some(house) = ctx.world.house_mut(house_id) {
            house.level = level;
        }
        let label = match material {
            Material::Iron => "an IRON FORTRESS",
            _ => "STONE",
        };
        ctx.emit(
            SimEventKind::HouseUpgraded {
                house: house_id,
                level,
            },
            format!("A house has been upgraded to {label}!"),
        );
    }
}

impl System for EcosystemSystem {
    fn name(&self) -> &str {
        "ecosystem"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.metabolize(ctx)?;
        self.bury_the_starved(ctx);
        self.spawn_food(ctx)?;
        self.grow_trees(ctx)?;
        self.roam_animals(ctx)?;
        self.upgrade_house(ctx);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::event::EventLog;
    use crate::spatial::Tracking;
    use hf_core::{AnimalKind, Calendar, House, HouseLevel, Human, World};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Bench {
        world: World,
        tracking: Tracking,
        events: EventLog,
        rng: StdRng,
        config: SimConfig,
        system: EcosystemSystem,
    }

    impl Bench {
        fn new() -> Self {
            let mut config = SimConfig::default();
            config.ecology.food_spawn_chance = 0.0;
            Self {
                world: World::new(),
                tracking: Tracking::new(),
                events: EventLog::new(0),
                rng: StdRng::seed_from_u64(13),
                config,
                system: EcosystemSystem::new(),
            }
        }

        fn tick(&mut self) {
            let mut ctx = SimContext {
                world: &mut self.world,
                tracking: &mut self.tracking,
                events: &mut self.events,
                rng: &mut self.rng,
                config: &self.config,
                speed: 1.0,
            };
            self.system.tick(&mut ctx).unwrap();
        }
    }

    #[test]
    fn hunger_decays_and_age_advances() {
        let mut bench = Bench::new();
        let id = bench
            .world
            .add_human(Human::new("Leo", Position::ORIGIN).with_cooldown(2))
            .unwrap();
        bench.tick();
        let human = bench.world.human(id).unwrap();
        assert!((human.hunger - 99.85).abs() < 1e-9);
        assert!((human.age - 0.05).abs() < 1e-9);
        assert_eq!(human.reproduction_cooldown, 1);
    }

    #[test]
    fn starved_human_is_removed_same_tick() {
        let mut bench = Bench::new();
        let id = bench
            .world
            .add_human(Human::new("Set", Position::ORIGIN).with_hunger(0.1).with_xp(3.3))
            .unwrap();
        let house = bench.world.add_house(House::new(Position::new(9.0, 9.0))).unwrap();
        bench.world.assign_house(id, house).unwrap();
        bench.tracking.seed_from(&bench.world);

        bench.tick();
        assert!(bench.world.human(id).is_none());
        assert!(!bench.tracking.humans.contains(id));
        assert_eq!(bench.world.house(house).unwrap().owner, None);
        assert_eq!(bench.system.deaths(), 1);
        insta::assert_snapshot!(
            bench.events.latest().unwrap().to_string(),
            @"[Death] Set has died. XP: 3.3"
        );
    }

    #[test]
    fn exposed_at_night_invents_bonfire() {
        let mut bench = Bench::new();
        bench.config.ecology.bonfire_chance = 1.0;
        bench.world.calendar = Calendar::new(0.0, 22.0);
        bench.world.inventory.add(Material::Wood, 5);
        let id = bench
            .world
            .add_human(Human::new("Iris", Position::new(3.0, 3.0)).with_xp(9.0))
            .unwrap();

        bench.tick();
        assert_eq!(bench.world.bonfire_count(), 1);
        assert_eq!(bench.world.inventory.wood, 0);
        // The fire was lit after the night penalty was already decided.
        let human = bench.world.human(id).unwrap();
        assert!((human.hunger - 99.7).abs() < 1e-9);

        // A second night with more wood does not crowd another fire nearby.
        bench.world.inventory.add(Material::Wood, 5);
        bench.world.human_mut(id).unwrap().position = Position::new(8.0, 3.0);
        bench.tick();
        assert_eq!(bench.world.bonfire_count(), 1);
    }

    #[test]
    fn food_respawns_up_to_cap() {
        let mut bench = Bench::new();
        bench.config.ecology.food_spawn_chance = 1.0;
        bench.config.ecology.max_food = 3;
        for _ in 0..10 {
            bench.tick();
        }
        assert_eq!(bench.world.food_count(), 3);
    }

    #[test]
    fn trees_grow_through_stages() {
        let mut bench = Bench::new();
        bench.config.ecology.tree_growth_per_tick = 0.5;
        bench.config.ecology.tree_seed_chance = 0.0;
        let id = bench
            .world
            .add_tree(Tree::new(TreeStage::Sapling, Position::ORIGIN))
            .unwrap();
        bench.tick();
        bench.tick();
        assert_eq!(bench.world.tree(id).unwrap().stage, TreeStage::Young);
        bench.tick();
        bench.tick();
        assert!(bench.world.tree(id).unwrap().is_adult());
    }

    #[test]
    fn adult_trees_seed_within_cap() {
        let mut bench = Bench::new();
        bench.config.ecology.tree_seed_chance = 1.0;
        bench.config.ecology.max_trees = 4;
        bench
            .world
            .add_tree(Tree::new(TreeStage::Adult, Position::ORIGIN))
            .unwrap();
        for _ in 0..10 {
            bench.tick();
        }
        assert_eq!(bench.world.tree_count(), 4);
    }

    #[test]
    fn animals_wander_within_bounds_and_breed() {
        let mut bench = Bench::new();
        bench.config.ecology.animal_reproduction_chance = 1.0;
        bench.config.ecology.animal_step = 0.0;
        let a = bench
            .world
            .add_animal(Animal::new(AnimalKind::Rabbit, Position::ORIGIN))
            .unwrap();
        bench
            .world
            .add_animal(Animal::new(AnimalKind::Rabbit, Position::new(1.0, 0.0)))
            .unwrap();
        bench
            .world
            .add_animal(Animal::new(AnimalKind::Chicken, Position::new(0.5, 0.5)))
            .unwrap();

        bench.tick();
        assert_eq!(bench.world.animal_count(), 4);
        assert_eq!(bench.system.animal_births(), 1);
        assert_eq!(bench.world.animal(a).unwrap().reproduction_cooldown, 200);
        assert_eq!(bench.tracking.animals.len(), 4);

        // Parents and young are all cooling down.
        bench.tick();
        assert_eq!(bench.world.animal_count(), 4);
    }

    #[test]
    fn houses_upgrade_with_stone_then_iron() {
        let mut bench = Bench::new();
        bench.config.ecology.upgrade_chance = 1.0;
        let house = bench.world.add_house(House::new(Position::ORIGIN)).unwrap();
        bench.world.inventory.add(Material::Stone, 12);
        bench.world.inventory.add(Material::Iron, 10);

        bench.tick();
        assert_eq!(bench.world.house(house).unwrap().level, HouseLevel::Stone);
        assert_eq!(bench.world.inventory.stone, 2);
        bench.tick();
        assert_eq!(bench.world.house(house).unwrap().level, HouseLevel::Iron);
        assert_eq!(bench.world.inventory.iron, 0);
        assert_eq!(
            bench.events.latest().unwrap().to_string(),
            "[Evolution] A house has been upgraded to an IRON FORTRESS!"
        );

        bench.tick();
        assert_eq!(bench.world.house(house).unwrap().level, HouseLevel::Iron);
    }
}
