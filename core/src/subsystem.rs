//! Subsystem trait.
//!
//! RULE: Subsystems are observers of the habitat. The engine calls
//! update() on each registered subsystem in registration order, after the
//! resource step and the crisis check of every tick. A subsystem may read
//! the crisis state but can never write resources, rates or the latch.

use crate::{
    alert::CrisisState,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    types::Tick,
};
use std::any::Any;

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per tick by the engine.
    ///
    /// - `tick`:      the current tick number
    /// - `events_in`: events emitted earlier this tick
    /// - `crisis`:    the crisis latch as it stands after this tick's check
    /// - `rng`:       this subsystem's deterministic RNG for this tick
    ///
    /// Returns a vec of new events to add to the tick's event log.
    fn update(
        &mut self,
        tick: Tick,
        events_in: &[SimEvent],
        crisis: &CrisisState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>>;

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}
