//! Per-channel readouts for the metric cards.

use crate::{
    resources::{Channel, RateVector, ResourceState},
    scenario::ScenarioKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Nominal,
    Caution,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReadout {
    pub channel: Channel,
    pub value: f64,
    pub rate: f64,
    pub severity: Severity,
    pub trend: Trend,
    /// The stabilize button is greyed out for a healthy, near-flat channel.
    pub stabilize_available: bool,
    /// The active scenario is hitting this channel.
    pub scenario_highlight: bool,
}

pub fn severity(channel: Channel, value: f64) -> Severity {
    match channel {
        Channel::Temperature if value > 40.0 || value < 10.0 => Severity::Critical,
        Channel::Temperature => Severity::Nominal,
        _ if value < 30.0 => Severity::Critical,
        _ if value < 50.0 => Severity::Caution,
        _ => Severity::Nominal,
    }
}

pub fn trend(rate: f64) -> Trend {
    if rate > 0.0 {
        Trend::Rising
    } else if rate < 0.0 {
        Trend::Falling
    } else {
        Trend::Steady
    }
}

pub fn readout(
    channel: Channel,
    resources: &ResourceState,
    rates: &RateVector,
    active: Option<ScenarioKind>,
) -> ChannelReadout {
    let value = resources.get(channel);
    let rate = rates.get(channel);
    ChannelReadout {
        channel,
        value,
        rate,
        severity: severity(channel, value),
        trend: trend(rate),
        stabilize_available: !(rate.abs() < 0.1 && value > 90.0),
        scenario_highlight: active.map(|k| k.highlighted_channel()) == Some(channel),
    }
}

/// Readouts for all four channels in display order.
pub fn readouts(
    resources: &ResourceState,
    rates: &RateVector,
    active: Option<ScenarioKind>,
) -> Vec<ChannelReadout> {
    Channel::ALL
        .iter()
        .map(|&c| readout(c, resources, rates, active))
        .collect()
}
