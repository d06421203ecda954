//! Snapshot serialization: full simulation state to/from JSON.
//!
//! A snapshot is taken every SNAPSHOT_INTERVAL ticks and kept in the
//! session store. It captures everything needed to resume the engine
//! from that tick; the history window is rebuilt by later ticks.

use crate::{
    alert::CrisisState,
    clock::SimClock,
    resources::{RateVector, ResourceState},
    scenario::ScenarioKind,
    types::{RunId, Tick},
};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_INTERVAL: Tick = 30; // one full history window

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub run_id: RunId,
    pub tick: Tick,
    pub clock: SimClock,
    pub resources: ResourceState,
    pub rates: RateVector,
    pub crisis: CrisisState,
    pub active_scenario: Option<ScenarioKind>,
}
