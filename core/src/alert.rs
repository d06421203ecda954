//! Crisis latch and alert surface state.
//!
//! RULE: only the CrisisController writes CrisisState. Everything else
//! (presentation, telemetry) reads it through `&CrisisState`.
//!
//! The latch is edge-triggered: once `crisis_mode` is set, threshold
//! evaluation is skipped entirely until an explicit reset clears it.

use crate::{config::AlertThresholds, resources::ResourceState, types::EntityId};
use serde::{Deserialize, Serialize};

/// Threshold breaches, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisAlert {
    StructuralIntegrity,
    OxygenCritical,
    Overheating,
}

impl CrisisAlert {
    pub fn message(&self) -> &'static str {
        match self {
            Self::StructuralIntegrity => "CRITICAL: STRUCTURAL INTEGRITY FAILING",
            Self::OxygenCritical      => "DANGER: OXYGEN LEVELS CRITICAL",
            Self::Overheating         => "WARNING: OVERHEATING",
        }
    }
}

/// First breached threshold, or None. Integrity beats oxygen beats heat.
pub fn evaluate(state: &ResourceState, thresholds: &AlertThresholds) -> Option<CrisisAlert> {
    if state.integrity < thresholds.integrity_critical {
        Some(CrisisAlert::StructuralIntegrity)
    } else if state.oxygen < thresholds.oxygen_critical {
        Some(CrisisAlert::OxygenCritical)
    } else if state.temperature > thresholds.temperature_overheat {
        Some(CrisisAlert::Overheating)
    } else {
        None
    }
}

/// The process-wide crisis flag plus the alert payload shown by the modal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrisisState {
    pub crisis_mode:   bool,
    pub alert_message: Option<String>,
    pub alert_visible: bool,
    /// Changes every time the surface is (re)opened.
    pub alert_id:      Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct CrisisController {
    thresholds: AlertThresholds,
    state:      CrisisState,
}

impl CrisisController {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds, state: CrisisState::default() }
    }

    pub fn state(&self) -> &CrisisState {
        &self.state
    }

    pub fn in_crisis(&self) -> bool {
        self.state.crisis_mode
    }

    /// Post-tick check. Skipped while a crisis is latched.
    pub fn evaluate_tick(&mut self, resources: &ResourceState) -> Option<CrisisAlert> {
        if self.state.crisis_mode {
            return None;
        }
        let alert = evaluate(resources, &self.thresholds)?;
        self.open(alert.message().to_string(), true);
        Some(alert)
    }

    /// Manual latch used by scenarios. Returns false (and changes nothing)
    /// when a crisis is already latched.
    pub fn latch(&mut self, message: &str) -> bool {
        if self.state.crisis_mode {
            return false;
        }
        self.open(message.to_string(), true);
        true
    }

    /// Clear the crisis and re-open the surface with an informational message.
    pub fn announce_reset(&mut self, message: &str) {
        self.state.crisis_mode = false;
        self.open(message.to_string(), false);
    }

    /// Hide the alert surface. Crisis mode is untouched.
    /// Returns whether the surface was visible.
    pub fn acknowledge(&mut self) -> bool {
        std::mem::replace(&mut self.state.alert_visible, false)
    }

    /// Reinstate a latch captured in a snapshot.
    pub fn restore(&mut self, state: CrisisState) {
        self.state = state;
    }

    fn open(&mut self, message: String, crisis: bool) {
        if crisis {
            self.state.crisis_mode = true;
        }
        self.state.alert_message = Some(message);
        self.state.alert_visible = true;
        self.state.alert_id = Some(uuid::Uuid::new_v4().to_string());
    }
}
