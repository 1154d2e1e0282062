use hf_core::World;
use rand::rngs::StdRng;

use crate::config::SimConfig;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::spatial::Tracking;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    pub world: &'a mut World,
    pub tracking: &'a mut Tracking,
    pub events: &'a mut EventLog,
    pub rng: &'a mut StdRng,
    pub config: &'a SimConfig,
    /// Current speed multiplier.
    pub speed: f64,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        let event = SimEvent::new(self.tick(), kind, description);
        tracing::info!(tick = event.tick, "{event}");
        self.events.push(event);
    }

    pub fn tick(&self) -> u64 {
        self.world.calendar.tick()
    }
}
