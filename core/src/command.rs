use serde::{Deserialize, Serialize};
use crate::{
    clock::SimSpeed,
    error::SimError,
    resources::Channel,
    scenario::ScenarioKind,
    types::{EntityId, RunId, Tick},
};

/// All operator-issued commands, as they arrive on the wire.
/// Scenario and channel stay strings here so a bad name is reported
/// back to the sender instead of failing the whole request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Clock control ─────────────────────────────
    Pause,
    Resume,
    SetSpeed { speed: SimSpeed },

    // ── Chaos engine ──────────────────────────────
    TriggerScenario { scenario: String },

    // ── Recovery ──────────────────────────────────
    Stabilize { channel: String },
    Reset,
    AcknowledgeAlert,
}

impl PlayerCommand {
    pub fn command_type(&self) -> &'static str {
        match self {
            Self::Pause                  => "pause",
            Self::Resume                 => "resume",
            Self::SetSpeed { .. }        => "set_speed",
            Self::TriggerScenario { .. } => "trigger_scenario",
            Self::Stabilize { .. }       => "stabilize",
            Self::Reset                  => "reset",
            Self::AcknowledgeAlert       => "acknowledge_alert",
        }
    }
}

/// A validated command, ready for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorAction {
    Pause,
    Resume,
    SetSpeed(SimSpeed),
    TriggerScenario(ScenarioKind),
    Stabilize(Channel),
    Reset,
    AcknowledgeAlert,
}

impl TryFrom<&PlayerCommand> for OperatorAction {
    type Error = SimError;

    fn try_from(command: &PlayerCommand) -> Result<Self, Self::Error> {
        Ok(match command {
            PlayerCommand::Pause                       => Self::Pause,
            PlayerCommand::Resume                      => Self::Resume,
            PlayerCommand::SetSpeed { speed }          => Self::SetSpeed(*speed),
            PlayerCommand::TriggerScenario { scenario } => Self::TriggerScenario(scenario.parse()?),
            PlayerCommand::Stabilize { channel }       => Self::Stabilize(channel.parse()?),
            PlayerCommand::Reset                       => Self::Reset,
            PlayerCommand::AcknowledgeAlert            => Self::AcknowledgeAlert,
        })
    }
}

/// A command scheduled to run at the start of a future tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedCommand {
    pub run_id:     RunId,
    pub due_at:     Tick,
    pub command_id: EntityId,
    pub command:    PlayerCommand,
}
