//! Habitat configuration.
//!
//! Every tunable constant of the simulation lives here. The defaults are
//! the reference behaviour; a JSON file may override any subset of them.

use crate::{
    error::{SimError, SimResult},
    resources::{Channel, RateVector, ResourceState},
    scenario::ScenarioKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitatConfig {
    /// Scheduler period between two ticks.
    pub tick_period_ms: u64,
    /// Bound of the history FIFO.
    pub history_length: usize,
    pub initial_resources: ResourceState,
    pub nominal_rates: RateVector,
    pub recovery: RecoveryConfig,
    pub thresholds: AlertThresholds,
    pub scenarios: ScenarioConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for HabitatConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            history_length: 30,
            initial_resources: ResourceState::default(),
            nominal_rates: RateVector::nominal(),
            recovery: RecoveryConfig::default(),
            thresholds: AlertThresholds::default(),
            scenarios: ScenarioConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Operator stabilize constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub oxygen: f64,
    pub power: f64,
    pub integrity: f64,
    /// Temperature the proportional controller steers toward (°C).
    pub temperature_set_point: f64,
    /// Fraction of the temperature error applied as the new rate.
    pub temperature_gain: f64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            oxygen: 0.5,
            power: 1.0,
            integrity: 0.1,
            temperature_set_point: 20.0,
            temperature_gain: 0.1,
        }
    }
}

impl RecoveryConfig {
    /// Additive recovery step. Temperature has none; it uses the set point.
    pub fn step(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Oxygen      => Some(self.oxygen),
            Channel::Power       => Some(self.power),
            Channel::Integrity   => Some(self.integrity),
            Channel::Temperature => None,
        }
    }
}

/// Crisis latch thresholds, checked in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Alert when integrity drops strictly below this.
    pub integrity_critical: f64,
    /// Alert when oxygen drops strictly below this.
    pub oxygen_critical: f64,
    /// Alert when temperature rises strictly above this.
    pub temperature_overheat: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            integrity_critical: 20.0,
            oxygen_critical: 15.0,
            temperature_overheat: 50.0,
        }
    }
}

/// What a scenario does to the rate vector (and, for ice, to integrity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEffect {
    pub alert_message: String,
    pub rate_overrides: Vec<(Channel, f64)>, // ordered, not HashMap
    /// Instant integrity loss applied when the scenario fires.
    #[serde(default)]
    pub integrity_shock: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub reactor: ScenarioEffect,
    pub ice: ScenarioEffect,
    pub hull: ScenarioEffect,
    pub reset_message: String,
}

impl ScenarioConfig {
    pub fn effect(&self, kind: ScenarioKind) -> &ScenarioEffect {
        match kind {
            ScenarioKind::Reactor => &self.reactor,
            ScenarioKind::Ice     => &self.ice,
            ScenarioKind::Hull    => &self.hull,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            reactor: ScenarioEffect {
                alert_message: "REACTOR SCRAM INITIATED. OFF-LINE. BATTERY RESERVES DRAINING.".into(),
                rate_overrides: vec![
                    (Channel::Power, -2.5),
                    (Channel::Temperature, -0.5),
                ],
                integrity_shock: 0.0,
            },
            ice: ScenarioEffect {
                alert_message: "SEISMIC ACTIVITY DETECTED. STRUCTURAL STRESS INCREASING.".into(),
                rate_overrides: vec![
                    (Channel::Integrity, -0.5),
                    (Channel::Power, -0.2),
                ],
                integrity_shock: 15.0,
            },
            hull: ScenarioEffect {
                alert_message: "HULL BREACH. ATMOSPHERE VENTING.".into(),
                rate_overrides: vec![
                    (Channel::Oxygen, -3.0),
                    (Channel::Temperature, -1.0),
                    (Channel::Integrity, -0.2),
                ],
                integrity_shock: 0.0,
            },
            reset_message: "Systems stabilized. Returning to nominal operation.".into(),
        }
    }
}

/// Parameters of the display-only telemetry generators.
/// Jitter values are full widths: a reading moves by `(u - 0.5) * jitter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub interval_ticks: u64,
    pub core_nominal_temp: f64,
    pub core_jitter: f64,
    pub core_spike_chance: f64,
    pub core_spike_jitter: f64,
    pub core_min_temp: f64,
    pub core_max_temp: f64,
    pub crisis_core_drop: f64,
    pub rated_output_mw: f64,
    pub output_jitter: f64,
    pub crisis_output_mw: f64,
    pub crisis_output_jitter: f64,
    pub output_floor_mw: f64,
    pub output_ceiling_mw: f64,
    pub cogeneration_threshold_mw: f64,
    pub external_pressure_mpa: f64,
    pub pressure_jitter: f64,
    pub o2_saturation: f64,
    pub o2_saturation_jitter: f64,
    pub water_flow: f64,
    pub water_flow_jitter: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 2,
            core_nominal_temp: 600.0,
            core_jitter: 5.0,
            core_spike_chance: 0.05,
            core_spike_jitter: 150.0,
            core_min_temp: 200.0,
            core_max_temp: 800.0,
            crisis_core_drop: 20.0,
            rated_output_mw: 18.4,
            output_jitter: 0.2,
            crisis_output_mw: 1.84,
            crisis_output_jitter: 0.4,
            output_floor_mw: 15.0,
            output_ceiling_mw: 18.8,
            cogeneration_threshold_mw: 16.5,
            external_pressure_mpa: 50.1,
            pressure_jitter: 0.2,
            o2_saturation: 98.2,
            o2_saturation_jitter: 0.5,
            water_flow: 1200.0,
            water_flow_jitter: 50.0,
        }
    }
}

impl HabitatConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    /// In tests, use HabitatConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: HabitatConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded habitat config from {path}");
        Ok(config)
    }

    /// Config with the reference defaults, for use in tests.
    pub fn default_test() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.tick_period_ms == 0 {
            return Err(invalid("tick_period_ms must be > 0"));
        }
        if self.history_length == 0 {
            return Err(invalid("history_length must be > 0"));
        }
        if self.telemetry.interval_ticks == 0 {
            return Err(invalid("telemetry.interval_ticks must be > 0"));
        }
        let t = &self.telemetry;
        let telemetry_values = [
            t.core_nominal_temp, t.core_jitter, t.core_spike_chance, t.core_spike_jitter,
            t.core_min_temp, t.core_max_temp, t.crisis_core_drop, t.rated_output_mw,
            t.output_jitter, t.crisis_output_mw, t.crisis_output_jitter, t.output_floor_mw,
            t.output_ceiling_mw, t.cogeneration_threshold_mw, t.external_pressure_mpa,
            t.pressure_jitter, t.o2_saturation, t.o2_saturation_jitter, t.water_flow,
            t.water_flow_jitter,
        ];
        if telemetry_values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("telemetry values must be finite"));
        }
        if t.core_min_temp > t.core_max_temp {
            return Err(invalid("telemetry.core_min_temp must be <= core_max_temp"));
        }
        // Crisis output clamps from 0, so the ceiling must admit it too.
        if t.output_floor_mw > t.output_ceiling_mw || t.output_ceiling_mw < 0.0 {
            return Err(invalid("telemetry.output_floor_mw must be <= output_ceiling_mw, ceiling >= 0"));
        }
        if !self.initial_resources.in_domain() {
            return Err(invalid("initial_resources must lie inside the channel domains"));
        }
        let thresholds = [
            (Channel::Integrity, self.thresholds.integrity_critical),
            (Channel::Oxygen, self.thresholds.oxygen_critical),
            (Channel::Temperature, self.thresholds.temperature_overheat),
        ];
        for (channel, value) in thresholds {
            let (min, max) = channel.domain();
            if !(min..=max).contains(&value) {
                return Err(invalid(&format!(
                    "{channel} threshold {value} outside [{min}, {max}]"
                )));
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> SimError {
    SimError::InvalidConfig { reason: reason.to_string() }
}
