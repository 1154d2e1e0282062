//! Configuration for a simulation run.
//!
//! Every numeric threshold of the engine lives here. All sections
//! deserialize with defaults, so a config file only has to name the values
//! it changes.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Top-level configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Half-width of the square map; positions stay within `[-limit, limit]`.
    pub map_limit: f64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Speed multiplier the simulation starts with.
    pub initial_speed: f64,
    pub scheduler: SchedulerConfig,
    pub generation: GenerationConfig,
    pub agents: AgentConfig,
    pub ecology: EcologyConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            map_limit: 70.0,
            max_events: 50,
            initial_speed: 1.0,
            scheduler: SchedulerConfig::default(),
            generation: GenerationConfig::default(),
            agents: AgentConfig::default(),
            ecology: EcologyConfig::default(),
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the half-width of the map.
    pub fn with_map_limit(mut self, limit: f64) -> Self {
        self.map_limit = limit;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the initial speed multiplier.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.initial_speed = speed;
        self
    }

    /// Set the logical duration of one tick, in seconds.
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.scheduler.tick_rate = tick_rate;
        self
    }

    /// Replace the world generation settings.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Replace the agent behavior settings.
    pub fn with_agents(mut self, agents: AgentConfig) -> Self {
        self.agents = agents;
        self
    }

    /// Replace the ecosystem settings.
    pub fn with_ecology(mut self, ecology: EcologyConfig) -> Self {
        self.ecology = ecology;
        self
    }

    /// Check the values the engine cannot run without.
    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            ("map_limit", self.map_limit),
            ("scheduler.tick_rate", self.scheduler.tick_rate),
            ("scheduler.discard_multiple", self.scheduler.discard_multiple),
            ("agents.base_speed", self.agents.base_speed),
            ("agents.steering_response", self.agents.steering_response),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("agents.wander_range", self.agents.wander_range),
            ("agents.build_clearance", self.agents.build_clearance),
            ("agents.idle_wait_min", self.agents.idle_wait_min),
            ("ecology.tree_seed_offset", self.ecology.tree_seed_offset),
            ("ecology.animal_step", self.ecology.animal_step),
            ("ecology.newborn_offset", self.ecology.newborn_offset),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        let a = &self.agents;
        let e = &self.ecology;
        let chances = [
            ("agents.build_chance", a.build_chance),
            ("agents.reproduction_chance", a.reproduction_chance),
            ("ecology.bonfire_chance", e.bonfire_chance),
            ("ecology.food_spawn_chance", e.food_spawn_chance),
            ("ecology.farm_chance", e.farm_chance),
            ("ecology.tree_seed_chance", e.tree_seed_chance),
            ("ecology.animal_reproduction_chance", e.animal_reproduction_chance),
            ("ecology.upgrade_chance", e.upgrade_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be a probability in [0, 1], got {value}"
                )));
            }
        }
        let finite = [
            ("agents.seek_food_hunger", a.seek_food_hunger),
            ("agents.homeless_seek_food_hunger", a.homeless_seek_food_hunger),
            ("agents.critical_hunger", a.critical_hunger),
            ("agents.vision_radius", a.vision_radius),
            ("agents.home_radius", a.home_radius),
            ("agents.eat_distance", a.eat_distance),
            ("agents.hunt_distance", a.hunt_distance),
            ("agents.claim_radius", a.claim_radius),
            ("agents.claim_distance", a.claim_distance),
            ("agents.build_hunger", a.build_hunger),
            ("agents.house_hunger_cost", a.house_hunger_cost),
            ("agents.love_hunger", a.love_hunger),
            ("agents.maturity_age", a.maturity_age),
            ("agents.loving_distance", a.loving_distance),
            ("agents.work_hunger", a.work_hunger),
            ("agents.action_distance", a.action_distance),
            ("agents.work_rate", a.work_rate),
            ("agents.work_rate_per_xp", a.work_rate_per_xp),
            ("agents.home_threshold", a.home_threshold),
            ("agents.idle_wait_max", a.idle_wait_max),
            ("agents.hunt_boost", a.hunt_boost),
            ("agents.mate_boost", a.mate_boost),
            ("agents.starving_boost", a.starving_boost),
            ("agents.personal_space", a.personal_space),
            ("agents.house_space", a.house_space),
            ("agents.separation_strength", a.separation_strength),
            ("agents.arrive_distance", a.arrive_distance),
            ("agents.flee_distance", a.flee_distance),
            ("ecology.years_per_tick", e.years_per_tick),
            ("ecology.hours_per_tick", e.hours_per_tick),
            ("ecology.hunger_decay", e.hunger_decay),
            ("ecology.house_bonus[0]", e.house_bonus[0]),
            ("ecology.house_bonus[1]", e.house_bonus[1]),
            ("ecology.house_bonus[2]", e.house_bonus[2]),
            ("ecology.house_shelter_radius", e.house_shelter_radius),
            ("ecology.bonfire_radius", e.bonfire_radius),
            ("ecology.night_multiplier", e.night_multiplier),
            ("ecology.aging_per_tick", e.aging_per_tick),
            ("ecology.bonfire_xp", e.bonfire_xp),
            ("ecology.bonfire_spacing", e.bonfire_spacing),
            ("ecology.farm_xp", e.farm_xp),
            ("ecology.tree_growth_per_tick", e.tree_growth_per_tick),
            ("ecology.animal_mating_range", e.animal_mating_range),
            ("ecology.reproduction_hunger_min", e.reproduction_hunger_min),
            ("ecology.reproduction_hunger_cost", e.reproduction_hunger_cost),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
        for founder in &self.generation.founders {
            let values = [founder.x, founder.z, founder.age, founder.xp];
            if !values.iter().all(|v| v.is_finite()) {
                return Err(SimError::InvalidConfig(format!(
                    "founder {} has a non-finite field",
                    founder.name
                )));
            }
        }
        if self.scheduler.max_ticks_per_frame == 0 {
            return Err(SimError::InvalidConfig(
                "scheduler.max_ticks_per_frame must be at least 1".into(),
            ));
        }
        if self.agents.idle_wait_min > self.agents.idle_wait_max {
            return Err(SimError::InvalidConfig(
                "agents.idle_wait_min exceeds agents.idle_wait_max".into(),
            ));
        }
        if !(self.initial_speed.is_finite() && self.initial_speed > 0.0) {
            return Err(SimError::InvalidSpeed(self.initial_speed));
        }
        Ok(())
    }
}

/// Fixed-step scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Logical seconds per tick.
    pub tick_rate: f64,
    /// Hard cap on ticks processed for a single frame.
    pub max_ticks_per_frame: u32,
    /// Leftover budget above `tick_rate * discard_multiple` is dropped after a capped frame.
    pub discard_multiple: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_rate: 0.1,
            max_ticks_per_frame: 10,
            discard_multiple: 2.0,
        }
    }
}

/// A human placed at world creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FounderConfig {
    pub name: String,
    pub x: f64,
    pub z: f64,
    pub age: f64,
    pub xp: f64,
}

/// Initial population of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub wild_foods: usize,
    pub rocks: usize,
    pub rock_durability: u32,
    pub iron_veins: usize,
    pub iron_durability: u32,
    /// Trees are seeded with a random mix of stages.
    pub trees: usize,
    pub animals: usize,
    pub founders: Vec<FounderConfig>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            wild_foods: 100,
            rocks: 40,
            rock_durability: 20,
            iron_veins: 20,
            iron_durability: 30,
            trees: 60,
            animals: 20,
            founders: vec![
                FounderConfig {
                    name: "Adán".into(),
                    x: -5.0,
                    z: 0.0,
                    age: 20.0,
                    xp: 2.0,
                },
                FounderConfig {
                    name: "Eva".into(),
                    x: 5.0,
                    z: 0.0,
                    age: 20.0,
                    xp: 2.0,
                },
            ],
        }
    }
}

impl GenerationConfig {
    /// A world with nothing in it.
    pub fn empty() -> Self {
        Self {
            wild_foods: 0,
            rocks: 0,
            iron_veins: 0,
            trees: 0,
            animals: 0,
            founders: Vec::new(),
            ..Self::default()
        }
    }
}

/// Thresholds, distances and rates of the per-agent decision logic.
///
/// Distances are world units. Rates are per wall-clock second at 1x speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // Survival
    /// Hunger below which an agent looks for food.
    pub seek_food_hunger: f64,
    /// Hunger below which a homeless agent looks for food.
    pub homeless_seek_food_hunger: f64,
    /// Hunger at or below which the home-proximity filter is dropped.
    pub critical_hunger: f64,
    /// Animals farther than this are not noticed.
    pub vision_radius: f64,
    /// Preferred foraging and working radius around an agent's house.
    pub home_radius: f64,
    pub eat_distance: f64,
    pub hunt_distance: f64,

    // Shelter
    pub claim_radius: f64,
    pub claim_distance: f64,
    pub build_hunger: f64,
    /// Chance per tick that a qualifying agent founds a house.
    pub build_chance: f64,
    pub house_wood_cost: u32,
    pub house_hunger_cost: f64,
    /// Minimum spacing between a new house and any static entity.
    pub build_clearance: f64,

    // Reproduction
    pub love_hunger: f64,
    pub maturity_age: f64,
    pub loving_distance: f64,
    /// Chance per tick that two agents in loving distance conceive.
    pub reproduction_chance: f64,
    pub reproduction_requires_house: bool,

    // Work
    pub work_hunger: f64,
    /// Wood stock below which agents prefer felling trees.
    pub low_wood: u32,
    pub action_distance: f64,
    /// Extraction successes per second for a novice.
    pub work_rate: f64,
    /// Extra successes per second per point of experience.
    pub work_rate_per_xp: f64,

    // Rest and idle
    pub home_threshold: f64,
    /// Idle wait window, logical seconds.
    pub idle_wait_min: f64,
    pub idle_wait_max: f64,
    pub wander_range: f64,

    // Movement
    /// World units per wall-clock second at 1x.
    pub base_speed: f64,
    pub hunt_boost: f64,
    pub mate_boost: f64,
    pub starving_boost: f64,
    pub personal_space: f64,
    pub house_space: f64,
    pub separation_strength: f64,
    /// Low-pass response of the velocity filter, per logical second.
    pub steering_response: f64,
    pub arrive_distance: f64,
    /// How far a new parent walks away after a birth.
    pub flee_distance: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            seek_food_hunger: 40.0,
            homeless_seek_food_hunger: 70.0,
            critical_hunger: 20.0,
            vision_radius: 60.0,
            home_radius: 30.0,
            eat_distance: 1.0,
            hunt_distance: 1.2,

            claim_radius: 40.0,
            claim_distance: 2.0,
            build_hunger: 60.0,
            build_chance: 0.01,
            house_wood_cost: 10,
            house_hunger_cost: 30.0,
            build_clearance: 2.5,

            love_hunger: 60.0,
            maturity_age: 18.0,
            loving_distance: 2.0,
            reproduction_chance: 0.05,
            reproduction_requires_house: true,

            work_hunger: 65.0,
            low_wood: 20,
            action_distance: 1.5,
            work_rate: 1.0,
            work_rate_per_xp: 0.1,

            home_threshold: 3.0,
            idle_wait_min: 1.0,
            idle_wait_max: 2.0,
            wander_range: 8.0,

            base_speed: 3.0,
            hunt_boost: 1.5,
            mate_boost: 1.3,
            starving_boost: 1.5,
            personal_space: 1.2,
            house_space: 1.5,
            separation_strength: 2.0,
            steering_response: 8.0,
            arrive_distance: 0.1,
            flee_distance: 6.0,
        }
    }
}

/// Rates and caps of the per-tick ecosystem update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcologyConfig {
    // Calendar
    pub years_per_tick: f64,
    pub hours_per_tick: f64,

    // Hunger
    pub hunger_decay: f64,
    /// Decay reduction by house tier: wood, stone, iron.
    pub house_bonus: [f64; 3],
    pub house_shelter_radius: f64,
    pub bonfire_radius: f64,
    pub night_multiplier: f64,
    pub aging_per_tick: f64,

    // Bonfires
    pub bonfire_xp: f64,
    pub bonfire_chance: f64,
    pub bonfire_wood_cost: u32,
    /// No new bonfire is lit within this distance of an existing one.
    pub bonfire_spacing: f64,

    // Food
    pub max_food: usize,
    pub food_spawn_chance: f64,
    pub farm_xp: f64,
    pub farm_chance: f64,
    pub farm_capacity: u32,

    // Trees
    pub tree_growth_per_tick: f64,
    pub tree_seed_chance: f64,
    pub tree_seed_offset: f64,
    pub max_trees: usize,
    pub wood_per_tree: u32,

    // Animals
    pub animal_step: f64,
    pub animal_mating_range: f64,
    pub animal_reproduction_chance: f64,
    pub animal_cooldown: u32,
    pub max_animals: usize,

    // Houses
    pub upgrade_chance: f64,
    pub upgrade_cost: u32,

    // Reproduction
    pub reproduction_cooldown: u32,
    /// Extra cooldown given to newborns on top of the standard one.
    pub newborn_extra_cooldown: u32,
    pub reproduction_hunger_min: f64,
    pub reproduction_hunger_cost: f64,
    pub newborn_offset: f64,
}

impl Default for EcologyConfig {
    fn default() -> Self {
        Self {
            years_per_tick: 0.02,
            hours_per_tick: 0.1,

            hunger_decay: 0.15,
            house_bonus: [0.10, 0.12, 0.15],
            house_shelter_radius: 3.0,
            bonfire_radius: 4.0,
            night_multiplier: 2.0,
            aging_per_tick: 0.05,

            bonfire_xp: 8.0,
            bonfire_chance: 0.02,
            bonfire_wood_cost: 5,
            bonfire_spacing: 10.0,

            max_food: 200,
            food_spawn_chance: 0.2,
            farm_xp: 4.0,
            farm_chance: 0.5,
            farm_capacity: 5,

            tree_growth_per_tick: 0.002,
            tree_seed_chance: 0.002,
            tree_seed_offset: 6.0,
            max_trees: 150,
            wood_per_tree: 5,

            animal_step: 0.4,
            animal_mating_range: 2.0,
            animal_reproduction_chance: 0.01,
            animal_cooldown: 200,
            max_animals: 60,

            upgrade_chance: 0.1,
            upgrade_cost: 10,

            reproduction_cooldown: 40,
            newborn_extra_cooldown: 20,
            reproduction_hunger_min: 30.0,
            reproduction_hunger_cost: 20.0,
            newborn_offset: 2.0,
        }
    }
}
