//! Chaos scenarios and operator stabilize actions.
//!
//! Both only rewrite the rate vector; the ice scenario also hits integrity
//! once. Nothing here decays back to nominal on its own.

use crate::{
    config::{RecoveryConfig, ScenarioEffect},
    error::SimError,
    resources::{Channel, RateVector, ResourceState},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Main generator offline; batteries drain, heat bleeds away.
    Reactor,
    /// Ice quake; instant structural damage then continuous stress.
    Ice,
    /// Hull breach; atmosphere vents, sea water cools the module.
    Hull,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [ScenarioKind::Reactor, ScenarioKind::Ice, ScenarioKind::Hull];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reactor => "reactor",
            Self::Ice     => "ice",
            Self::Hull    => "hull",
        }
    }

    /// The channel whose metric card pulses while this scenario is active.
    pub fn highlighted_channel(&self) -> Channel {
        match self {
            Self::Reactor => Channel::Power,
            Self::Ice     => Channel::Integrity,
            Self::Hull    => Channel::Oxygen,
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "reactor" | "reactor-scram"           => Ok(Self::Reactor),
            "ice" | "ice-shift"                   => Ok(Self::Ice),
            "hull" | "hull-breach"                => Ok(Self::Hull),
            _ => Err(SimError::UnknownScenario { name: s.to_string() }),
        }
    }
}

/// Overwrite the scenario's rate entries and apply its integrity shock.
/// The shocked value is saturated into the integrity domain immediately.
pub fn apply_scenario(effect: &ScenarioEffect, resources: &mut ResourceState, rates: &mut RateVector) {
    if effect.integrity_shock != 0.0 {
        resources.integrity = Channel::Integrity.clamp(resources.integrity - effect.integrity_shock);
    }
    for &(channel, rate) in &effect.rate_overrides {
        rates.set(channel, rate);
    }
}

/// New rate for `channel` after one stabilize action.
///
/// Temperature: proportional control toward the set point, recomputed from
/// the live error each call. Other channels: add the recovery step, then
/// cap at nominal, except power, which may overcharge.
pub fn stabilized_rate(
    channel: Channel,
    resources: &ResourceState,
    rates: &RateVector,
    nominal: &RateVector,
    recovery: &RecoveryConfig,
) -> f64 {
    let Some(step) = recovery.step(channel) else {
        let error = recovery.temperature_set_point - resources.temperature;
        return error * recovery.temperature_gain;
    };
    let raised = rates.get(channel) + step;
    let ceiling = nominal.get(channel);
    if raised > ceiling && channel != Channel::Power {
        ceiling
    } else {
        raised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn scenario_names_parse() {
        assert_eq!("reactor-scram".parse::<ScenarioKind>().unwrap(), ScenarioKind::Reactor);
        assert_eq!("ICE_SHIFT".parse::<ScenarioKind>().unwrap(), ScenarioKind::Ice);
        assert_eq!("hull".parse::<ScenarioKind>().unwrap(), ScenarioKind::Hull);
        assert!(matches!(
            "meteor".parse::<ScenarioKind>(),
            Err(SimError::UnknownScenario { .. })
        ));
        assert!("seismic".parse::<ScenarioKind>().is_err());
    }

    #[test]
    fn reactor_scram_leaves_other_rates_alone() {
        let config = ScenarioConfig::default();
        let mut resources = ResourceState::default();
        let mut rates = RateVector::nominal();
        apply_scenario(&config.reactor, &mut resources, &mut rates);

        assert_eq!(rates.power, -2.5);
        assert_eq!(rates.temperature, -0.5);
        assert_eq!(rates.oxygen, -0.05);
        assert_eq!(rates.integrity, 0.0);
        assert_eq!(resources, ResourceState::default());
    }

    #[test]
    fn ice_shock_saturates_at_zero() {
        let config = ScenarioConfig::default();
        let mut resources = ResourceState { integrity: 10.0, ..ResourceState::default() };
        let mut rates = RateVector::nominal();
        apply_scenario(&config.ice, &mut resources, &mut rates);
        assert_eq!(resources.integrity, 0.0);
        assert_eq!(rates.integrity, -0.5);
        assert_eq!(rates.power, -0.2);
    }

    #[test]
    fn temperature_stabilize_tracks_live_error() {
        let recovery = RecoveryConfig::default();
        let nominal = RateVector::nominal();
        let hot = ResourceState { temperature: 60.0, ..ResourceState::default() };
        let cold = ResourceState { temperature: -10.0, ..ResourceState::default() };

        assert!(close(stabilized_rate(Channel::Temperature, &hot, &nominal, &nominal, &recovery), -4.0));
        assert!(close(stabilized_rate(Channel::Temperature, &cold, &nominal, &nominal, &recovery), 3.0));
    }

    #[test]
    fn oxygen_stabilize_caps_at_nominal() {
        let recovery = RecoveryConfig::default();
        let nominal = RateVector::nominal();
        let rates = RateVector { oxygen: -3.0, ..nominal };
        let once = stabilized_rate(Channel::Oxygen, &ResourceState::default(), &rates, &nominal, &recovery);
        assert!(close(once, -2.5));

        let near = RateVector { oxygen: -0.3, ..nominal };
        let capped = stabilized_rate(Channel::Oxygen, &ResourceState::default(), &near, &nominal, &recovery);
        assert_eq!(capped, -0.05);
    }

    #[test]
    fn power_stabilize_may_overcharge() {
        let recovery = RecoveryConfig::default();
        let nominal = RateVector::nominal();
        let rate = stabilized_rate(Channel::Power, &ResourceState::default(), &nominal, &nominal, &recovery);
        assert!(close(rate, 0.9));
    }
}
