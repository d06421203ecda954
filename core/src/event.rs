//! The event stream: everything the engine and operator actions did.
//!
//! RULE: Every state change is described by an event.
//! Presentation and tooling observe the simulation through these and
//! through the read-only view; they never poke engine state directly.

use crate::{
    alert::CrisisAlert,
    clock::SimSpeed,
    resources::Channel,
    scenario::ScenarioKind,
    types::{EntityId, RunId, Tick},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick: Tick,
    },
    RunInitialized {
        run_id: RunId,
        seed: u64,
    },
    ResourcesUpdated {
        tick: Tick,
        oxygen: f64,
        power: f64,
        integrity: f64,
        temperature: f64,
    },

    // ── Crisis latch ───────────────────────────────
    /// A threshold was crossed while no crisis was latched.
    ThresholdBreached {
        tick: Tick,
        alert: CrisisAlert,
        message: String,
    },
    AlertAcknowledged {
        tick: Tick,
    },

    // ── Operator actions ───────────────────────────
    ScenarioTriggered {
        tick: Tick,
        scenario: ScenarioKind,
        /// False when a crisis was already latched and the alert was skipped.
        alert_raised: bool,
    },
    ChannelStabilized {
        tick: Tick,
        channel: Channel,
        old_rate: f64,
        new_rate: f64,
    },
    SimulationReset {
        tick: Tick,
        message: String,
    },
    SimulationPaused {
        tick: Tick,
    },
    SimulationResumed {
        tick: Tick,
    },
    SpeedChanged {
        tick: Tick,
        speed: SimSpeed,
    },

    // ── Telemetry (display only) ───────────────────
    TelemetryUpdated {
        tick: Tick,
        core_a_temp: f64,
        core_b_temp: f64,
        power_output_mw: f64,
        cogeneration_active: bool,
        external_pressure_mpa: f64,
        o2_saturation: f64,
        water_flow: f64,
    },

    // ── Player command events ──────────────────────
    PlayerCommandReceived {
        tick: Tick,
        command_id: EntityId,
        command_type: String,
    },
}

impl SimEvent {
    /// Stable string name of the variant, used for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickStarted { .. }           => "tick_started",
            Self::TickCompleted { .. }         => "tick_completed",
            Self::RunInitialized { .. }        => "run_initialized",
            Self::ResourcesUpdated { .. }      => "resources_updated",
            Self::ThresholdBreached { .. }     => "threshold_breached",
            Self::AlertAcknowledged { .. }     => "alert_acknowledged",
            Self::ScenarioTriggered { .. }     => "scenario_triggered",
            Self::ChannelStabilized { .. }     => "channel_stabilized",
            Self::SimulationReset { .. }       => "simulation_reset",
            Self::SimulationPaused { .. }      => "simulation_paused",
            Self::SimulationResumed { .. }     => "simulation_resumed",
            Self::SpeedChanged { .. }          => "speed_changed",
            Self::TelemetryUpdated { .. }      => "telemetry_updated",
            Self::PlayerCommandReceived { .. } => "player_command_received",
        }
    }
}

/// The event log entry as stored in the session database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub tick: Tick,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}
