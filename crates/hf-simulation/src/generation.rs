use hf_core::{
    Animal, AnimalKind, FoodSource, Human, Position, ResourceKind, ResourceNode, Tree, TreeStage,
    World,
};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::GenerationConfig;
use crate::error::SimResult;
use crate::event::{SimEvent, SimEventKind};

/// Names given to newborns.
pub const NAMES: [&str; 20] = [
    "Adán", "Eva", "Caín", "Abel", "Set", "Nora", "Ava", "Leo", "Zoe", "Max", "Iris", "Noa",
    "Lía", "Hugo", "Alma", "Río", "Sol", "Luna", "Kai", "Mía",
];

/// Pick a random name from [`NAMES`].
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    NAMES.choose(rng).copied().unwrap_or(NAMES[0]).to_string()
}

/// A uniformly random point on the `[-limit, limit]²` map.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, limit: f64) -> Position {
    Position::new(
        (rng.random::<f64>() - 0.5) * 2.0 * limit,
        (rng.random::<f64>() - 0.5) * 2.0 * limit,
    )
}

/// Builds the initial population of a new world.
#[derive(Debug, Clone)]
pub struct ProceduralGenerator<'a> {
    config: &'a GenerationConfig,
    map_limit: f64,
}

impl<'a> ProceduralGenerator<'a> {
    pub fn new(config: &'a GenerationConfig, map_limit: f64) -> Self {
        Self { config, map_limit }
    }

    /// Scatter food, resource nodes, trees and animals over the map and
    /// place the founders.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<World> {
        let mut world = World::new();
        let limit = self.map_limit;

        for _ in 0..self.config.wild_foods {
            world.add_food(FoodSource::wild(random_position(rng, limit)))?;
        }
        for _ in 0..self.config.rocks {
            world.add_resource(ResourceNode::new(
                ResourceKind::Rock,
                random_position(rng, limit),
                self.config.rock_durability,
            ))?;
        }
        for _ in 0..self.config.iron_veins {
            world.add_resource(ResourceNode::new(
                ResourceKind::Iron,
                random_position(rng, limit),
                self.config.iron_durability,
            ))?;
        }
        for _ in 0..self.config.trees {
            // Mostly mature woodland with some undergrowth.
            let stage = [
                TreeStage::Sapling,
                TreeStage::Young,
                TreeStage::Adult,
                TreeStage::Adult,
            ]
            .choose(rng)
            .copied()
            .unwrap_or(TreeStage::Adult);
            world.add_tree(Tree::new(stage, random_position(rng, limit)))?;
        }
        for _ in 0..self.config.animals {
            let kind = if rng.random_bool(0.5) {
                AnimalKind::Rabbit
            } else {
                AnimalKind::Chicken
            };
            let mut animal = Animal::new(kind, random_position(rng, limit));
            animal.age = rng.random_range(0.0..5.0);
            world.add_animal(animal)?;
        }
        for founder in &self.config.founders {
            let position = Position::new(founder.x, founder.z).clamped(limit);
            world.add_human(
                Human::new(founder.name.clone(), position)
                    .with_age(founder.age)
                    .with_xp(founder.xp),
            )?;
        }

        tracing::info!(
            humans = world.population(),
            foods = world.food_count(),
            resources = world.resource_count(),
            trees = world.tree_count(),
            animals = world.animal_count(),
            "world generated"
        );
        Ok(world)
    }
}

/// Log entries a freshly generated world starts with, oldest first.
pub fn founding_events() -> [SimEvent; 2] {
    [
        SimEvent::new(0, SimEventKind::History, "The Iron Age begins."),
        SimEvent::new(0, SimEventKind::System, "Continent generated."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_generation_counts() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let world = ProceduralGenerator::new(&config.generation, config.map_limit)
            .generate(&mut rng)
            .unwrap();
        assert_eq!(world.food_count(), 100);
        assert_eq!(world.resource_count(), 60);
        assert_eq!(world.tree_count(), 60);
        assert_eq!(world.animal_count(), 20);
        assert_eq!(world.population(), 2);

        let names: Vec<&str> = world.humans().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Adán", "Eva"]);
    }

    #[test]
    fn everything_lies_within_map_bounds() {
        let config = SimConfig::default().with_map_limit(20.0);
        let mut rng = StdRng::seed_from_u64(9);
        let world = ProceduralGenerator::new(&config.generation, config.map_limit)
            .generate(&mut rng)
            .unwrap();
        let inside = |p: Position| p.x.abs() <= 20.0 && p.z.abs() <= 20.0;
        assert!(world.static_positions().all(inside));
        assert!(world.animals().all(|a| inside(a.position)));
        assert!(world.humans().all(|h| inside(h.position)));
    }

    #[test]
    fn same_seed_same_world() {
        let config = SimConfig::default();
        let generator = ProceduralGenerator::new(&config.generation, config.map_limit);
        let a = generator.generate(&mut StdRng::seed_from_u64(5)).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(5)).unwrap();
        let pa: Vec<Position> = a.static_positions().collect();
        let pb: Vec<Position> = b.static_positions().collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn resource_durabilities_follow_config() {
        let config = SimConfig::default();
        let world = ProceduralGenerator::new(&config.generation, config.map_limit)
            .generate(&mut StdRng::seed_from_u64(3))
            .unwrap();
        for node in world.resources() {
            let expected = match node.kind {
                ResourceKind::Rock => 20,
                ResourceKind::Iron => 30,
            };
            assert_eq!(node.durability, expected);
        }
    }

    #[test]
    fn random_names_come_from_the_list() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let name = random_name(&mut rng);
            assert!(NAMES.contains(&name.as_str()));
        }
    }
}
