use crate::context::SimContext;
use crate::error::SimResult;

/// One stage of the per-tick world update.
///
/// [`crate::Simulation`] runs its stages in registration order, agents
/// before the ecosystem, each with exclusive access to the world for the
/// duration of its call.
pub trait System: std::fmt::Debug {
    /// Label used in logs.
    fn name(&self) -> &str;

    /// Apply this stage's part of one tick.
    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()>;

    /// Runs before the first tick.
    fn init(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }

    /// Read-only access to the concrete stage, e.g. for the agent modes.
    fn as_any(&self) -> &dyn std::any::Any;
}
