//! Tick-driven life simulation for Hearthfield.
//!
//! A [`Simulation`] owns an [`hf_core::World`] and advances it one fixed
//! logical step at a time. Each step the [`agent::AgentSystem`] lets every
//! human pick and act on its most pressing need, then the
//! [`ecosystem::EcosystemSystem`] applies hunger, aging, death, regrowth and
//! upgrades. All randomness comes from a single seeded RNG, so a run is fully
//! reproducible from its [`SimConfig`].

/// Validated world mutations: eat, hunt, mine, chop, build, claim, reproduce.
pub mod actions;
/// Per-human need evaluation and the system that drives it.
pub mod agent;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Non-agent world dynamics.
pub mod ecosystem;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Initial world population.
pub mod generation;
/// Hunger decay and shelter.
pub mod needs;
/// Fixed-step scheduling of wall-clock frames.
pub mod scheduler;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Read-only state exports.
pub mod snapshot;
/// Position trackers and nearest-neighbor search.
pub mod spatial;
/// Movement resolution.
pub mod steering;
/// The trait that all simulation systems implement.
pub mod system;

/// Re-exports of [`actions::ActionOutcome`] and [`actions::Rejection`].
pub use actions::{ActionOutcome, Rejection};
/// Re-exports of the agent decision types.
pub use agent::{AgentSystem, Decision, Intent, Mode};
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-export of [`ecosystem::EcosystemSystem`].
pub use ecosystem::EcosystemSystem;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventCategory, EventLog, SimEvent, SimEventKind};
/// Re-export of [`generation::ProceduralGenerator`].
pub use generation::ProceduralGenerator;
/// Re-export of [`scheduler::TickScheduler`].
pub use scheduler::TickScheduler;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-exports of snapshot types.
pub use snapshot::{HumanView, WorldSnapshot};
/// Re-exports of the spatial types.
pub use spatial::{Nearest, SpatialLookup, Tracking};
/// Re-export of [`system::System`].
pub use system::System;
