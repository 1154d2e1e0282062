use std::time::Duration;

use hf_core::{EntityId, Position, World};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::agent::{AgentSystem, Mode};
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::ecosystem::EcosystemSystem;
use crate::error::{SimError, SimResult};
use crate::event::EventLog;
use crate::generation::{ProceduralGenerator, founding_events};
use crate::scheduler::TickScheduler;
use crate::snapshot::{HumanView, WorldSnapshot, population_label, weather};
use crate::spatial::{Nearest, Tracking};
use crate::system::System;

/// The top-level simulation orchestrator.
///
/// Owns the world, position trackers, RNG, event log, scheduler and
/// registered systems. Every tick advances the calendar, then runs the
/// systems in registration order: agents first, then the ecosystem.
pub struct Simulation {
    world: World,
    tracking: Tracking,
    rng: StdRng,
    events: EventLog,
    config: SimConfig,
    scheduler: TickScheduler,
    speed: f64,
    playing: bool,
    founders: Vec<EntityId>,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.current_tick())
            .field("population", &self.world.population())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Generate a fresh world from `config` and set up the default systems.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let world =
            ProceduralGenerator::new(&config.generation, config.map_limit).generate(&mut rng)?;
        let mut sim = Self::assemble(world, config, rng);
        for event in founding_events() {
            sim.events.push(event);
        }
        Ok(sim)
    }

    /// Run the default systems over a prepared world.
    ///
    /// Every human present at this point counts as a founder.
    pub fn from_world(world: World, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::assemble(world, config, rng))
    }

    fn assemble(world: World, config: SimConfig, rng: StdRng) -> Self {
        let mut tracking = Tracking::new();
        tracking.seed_from(&world);
        let mut sim = Self {
            founders: world.human_ids(),
            tracking,
            rng,
            events: EventLog::new(config.max_events),
            scheduler: TickScheduler::new(&config.scheduler),
            speed: config.initial_speed,
            playing: false,
            world,
            config,
            systems: Vec::new(),
            initialized: false,
        };
        sim.add_system(AgentSystem::new());
        sim.add_system(EcosystemSystem::new());
        sim
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    fn context(&mut self) -> SimContext<'_> {
        SimContext {
            world: &mut self.world,
            tracking: &mut self.tracking,
            events: &mut self.events,
            rng: &mut self.rng,
            config: &self.config,
            speed: self.speed,
        }
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = system.init(&mut self.context());
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        let eco = &self.config.ecology;
        let tick = self
            .world
            .calendar
            .advance(eco.years_per_tick, eco.hours_per_tick);
        let _span = tracing::debug_span!("tick", tick).entered();

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = system.tick(&mut self.context());
            if let Err(e) = &result {
                tracing::error!(system = system.name(), error = %e, "system failed");
            }
            self.systems[i] = system;
            result?;
        }
        self.tracking.prune(&self.world);
        Ok(())
    }

    /// Advance the simulation by `n` ticks, whether or not it is playing.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Feed one wall-clock frame to the scheduler and run the ticks it grants.
    ///
    /// Returns how many ticks ran.
    pub fn frame(&mut self, elapsed: Duration) -> SimResult<u32> {
        let ticks = self.scheduler.advance(elapsed, self.speed, self.playing);
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(ticks)
    }

    /// Flip between playing and paused. Returns the new state.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        tracing::info!(playing = self.playing, "play toggled");
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Change the speed multiplier.
    pub fn set_speed(&mut self, speed: f64) -> SimResult<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SimError::InvalidSpeed(speed));
        }
        self.speed = speed;
        tracing::info!(speed, "speed changed");
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Run `f` with a mutation context, e.g. to apply an action from outside
    /// the tick loop.
    pub fn with_context<T>(&mut self, f: impl FnOnce(&mut SimContext<'_>) -> T) -> T {
        f(&mut self.context())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tracking(&self) -> &Tracking {
        &self.tracking
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn current_tick(&self) -> u64 {
        self.world.calendar.tick()
    }

    /// The human closest to `position`, for display purposes.
    pub fn closest_human(&self, position: Position) -> Option<Nearest> {
        crate::spatial::nearest(
            position,
            self.world
                .humans()
                .map(|h| (h.id, self.tracking.humans.get_or(h.id, h.position))),
            None,
        )
    }

    /// The animal closest to `position`, for display purposes.
    pub fn closest_animal(&self, position: Position) -> Option<Nearest> {
        crate::spatial::nearest(
            position,
            self.world
                .animals()
                .map(|a| (a.id, self.tracking.animals.get_or(a.id, a.position))),
            None,
        )
    }

    /// The mode a human was in after the last tick.
    pub fn mode_of(&self, id: EntityId) -> Option<Mode> {
        self.get_system::<AgentSystem>().and_then(|a| a.mode(id))
    }

    /// Copy out everything a renderer needs.
    pub fn snapshot(&self) -> WorldSnapshot {
        let calendar = &self.world.calendar;
        let is_night = calendar.is_night();
        let living: Vec<_> = self.world.humans().collect();
        WorldSnapshot {
            tick: calendar.tick(),
            year: calendar.year(),
            time_of_day: calendar.time_of_day(),
            is_night,
            weather: weather(is_night).to_string(),
            population: living.len(),
            population_label: population_label(&living, &self.founders),
            speed: self.speed,
            playing: self.playing,
            inventory: self.world.inventory,
            humans: living
                .iter()
                .map(|h| HumanView {
                    human: (*h).clone(),
                    mode: self.mode_of(h.id).unwrap_or_default(),
                })
                .collect(),
            foods: self.world.foods().cloned().collect(),
            houses: self.world.houses().cloned().collect(),
            bonfires: self.world.bonfires().cloned().collect(),
            resources: self.world.resources().cloned().collect(),
            trees: self.world.trees().cloned().collect(),
            animals: self.world.animals().cloned().collect(),
            events: self.events.lines(),
        }
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
