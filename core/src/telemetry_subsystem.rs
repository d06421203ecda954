//! Ambient telemetry: reactor cores, external pressure, crew biometrics.
//!
//! Display-only. These readings jitter on their own interval and react to
//! the crisis flag, but nothing in the resource engine ever reads them.

use crate::{
    alert::CrisisState,
    config::TelemetryConfig,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    subsystem::SimSubsystem,
    types::Tick,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thermodynamics {
    pub core_a_temp: f64,
    pub core_b_temp: f64,
    pub power_output_mw: f64,
    pub cogeneration_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReadings {
    pub thermodynamics: Thermodynamics,
    pub external_pressure_mpa: f64,
    pub o2_saturation: f64,
    pub water_flow: f64,
}

impl TelemetryReadings {
    pub fn initial(config: &TelemetryConfig) -> Self {
        Self {
            thermodynamics: Thermodynamics {
                core_a_temp: config.core_nominal_temp,
                core_b_temp: config.core_nominal_temp,
                power_output_mw: config.rated_output_mw,
                cogeneration_active: true,
            },
            external_pressure_mpa: config.external_pressure_mpa,
            o2_saturation: config.o2_saturation,
            water_flow: config.water_flow,
        }
    }
}

pub struct TelemetrySubsystem {
    config: TelemetryConfig,
    pub state: TelemetryReadings,
}

impl TelemetrySubsystem {
    pub fn new(config: TelemetryConfig) -> Self {
        let state = TelemetryReadings::initial(&config);
        Self { config, state }
    }

    fn step_thermodynamics(&mut self, crisis_mode: bool, rng: &mut SubsystemRng) {
        let cfg = &self.config;
        let thermo = &mut self.state.thermodynamics;
        let mut core_a = thermo.core_a_temp;
        let mut core_b = thermo.core_b_temp;

        let output = if crisis_mode {
            core_a -= cfg.crisis_core_drop;
            core_b -= cfg.crisis_core_drop;
            cfg.crisis_output_mw + rng.jitter(cfg.crisis_output_jitter)
        } else {
            core_a += rng.jitter(cfg.core_jitter);
            core_b += rng.jitter(cfg.core_jitter);
            if rng.chance(cfg.core_spike_chance) {
                core_a += rng.jitter(cfg.core_spike_jitter);
            }
            if rng.chance(cfg.core_spike_chance) {
                core_b += rng.jitter(cfg.core_spike_jitter);
            }
            // Output falls off linearly as the cores drift from nominal.
            let avg = (core_a + core_b) / 2.0;
            let temp_factor = 1.0 - (cfg.core_nominal_temp - avg).abs() / 400.0;
            cfg.rated_output_mw * temp_factor + rng.jitter(cfg.output_jitter)
        };

        let floor = if crisis_mode { 0.0 } else { cfg.output_floor_mw };
        thermo.core_a_temp = core_a.clamp(cfg.core_min_temp, cfg.core_max_temp);
        thermo.core_b_temp = core_b.clamp(cfg.core_min_temp, cfg.core_max_temp);
        thermo.power_output_mw = output.clamp(floor, cfg.output_ceiling_mw);
        thermo.cogeneration_active = output > cfg.cogeneration_threshold_mw && !crisis_mode;
    }
}

impl SimSubsystem for TelemetrySubsystem {
    fn name(&self) -> &'static str { "telemetry" }

    fn update(
        &mut self,
        tick: Tick,
        _events_in: &[SimEvent],
        crisis: &CrisisState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        if !tick.is_multiple_of(self.config.interval_ticks) {
            return Ok(vec![]);
        }

        self.step_thermodynamics(crisis.crisis_mode, rng);

        let cfg = &self.config;
        self.state.external_pressure_mpa = cfg.external_pressure_mpa + rng.jitter(cfg.pressure_jitter);
        self.state.o2_saturation = cfg.o2_saturation + rng.jitter(cfg.o2_saturation_jitter);
        self.state.water_flow = cfg.water_flow + rng.jitter(cfg.water_flow_jitter);

        let thermo = &self.state.thermodynamics;
        log::debug!(
            "tick={tick} telemetry: cores={:.0}/{:.0} output={:.2}MW cogen={}",
            thermo.core_a_temp,
            thermo.core_b_temp,
            thermo.power_output_mw,
            thermo.cogeneration_active
        );

        Ok(vec![SimEvent::TelemetryUpdated {
            tick,
            core_a_temp:           thermo.core_a_temp,
            core_b_temp:           thermo.core_b_temp,
            power_output_mw:       thermo.power_output_mw,
            cogeneration_active:   thermo.cogeneration_active,
            external_pressure_mpa: self.state.external_pressure_mpa,
            o2_saturation:         self.state.o2_saturation,
            water_flow:            self.state.water_flow,
        }])
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
