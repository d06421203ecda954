//! Read-only state handed to the presentation surface.

use crate::{
    alert::CrisisState,
    clock::SimSpeed,
    history::HistorySample,
    readout::ChannelReadout,
    resources::{RateVector, ResourceState},
    scenario::ScenarioKind,
    telemetry_subsystem::TelemetryReadings,
    types::Tick,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub tick: Tick,
    pub paused: bool,
    pub speed: SimSpeed,
    pub tick_period_ms: u64,
    pub resources: ResourceState,
    pub rates: RateVector,
    pub history: Vec<HistorySample>,
    pub crisis: CrisisState,
    pub active_scenario: Option<ScenarioKind>,
    pub readouts: Vec<ChannelReadout>,
    pub telemetry: Option<TelemetryReadings>,
}
