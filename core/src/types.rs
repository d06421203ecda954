//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one fixed scheduler period (1 s by default).
pub type Tick = u64;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;
