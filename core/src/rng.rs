//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! Only the display-only telemetry draws random numbers; the resource
//! engine and crisis latch are fully deterministic without them.
//!
//! Streams are derived per (slot, tick) rather than carried across
//! ticks, so a restored or replayed tick draws exactly what it drew the
//! first time, with no generator state to snapshot.

use crate::types::Tick;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single subsystem slot.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create an RNG from the master seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Symmetric noise in [-width/2, width/2).
    pub fn jitter(&mut self, width: f64) -> f64 {
        (self.next_f64() - 0.5) * width
    }
}

/// All telemetry RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Fresh stream for `slot` at `tick`. Same inputs, same draws.
    pub fn for_subsystem_at_tick(&self, slot: SubsystemSlot, tick: Tick) -> SubsystemRng {
        let index = (slot as u64).wrapping_add(tick.wrapping_mul(SubsystemSlot::COUNT));
        SubsystemRng::new(self.master_seed, index).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every slot's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Telemetry = 0,
    // Append new slots here and bump COUNT.
}

impl SubsystemSlot {
    pub const COUNT: u64 = 1;

    pub fn name(&self) -> &'static str {
        match self {
            Self::Telemetry => "telemetry",
        }
    }
}
