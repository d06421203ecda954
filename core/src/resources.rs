//! Resource channels, their domains, and the pure tick function.
//!
//! RULE: every channel value is inside its domain after any tick or shock.
//! Out-of-range values are saturated, never rejected.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four scalar resource quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Oxygen,
    Power,
    Integrity,
    Temperature,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Oxygen,
        Channel::Power,
        Channel::Integrity,
        Channel::Temperature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Oxygen      => "oxygen",
            Self::Power       => "power",
            Self::Integrity   => "integrity",
            Self::Temperature => "temperature",
        }
    }

    /// Inclusive `(min, max)` bounds for the channel.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Temperature => (-50.0, 150.0),
            _                 => (0.0, 100.0),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (min, max) = self.domain();
        value.clamp(min, max)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oxygen"      => Ok(Self::Oxygen),
            "power"       => Ok(Self::Power),
            "integrity"   => Ok(Self::Integrity),
            "temperature" => Ok(Self::Temperature),
            _ => Err(SimError::UnknownChannel { name: s.to_string() }),
        }
    }
}

/// Four named channel values. Percentages, except temperature in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub oxygen:      f64,
    pub power:       f64,
    pub integrity:   f64,
    pub temperature: f64,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self {
            oxygen:      100.0,
            power:       100.0,
            integrity:   100.0,
            temperature: 20.0,
        }
    }
}

/// Per-tick signed delta for each channel. Magnitude is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateVector {
    pub oxygen:      f64,
    pub power:       f64,
    pub integrity:   f64,
    pub temperature: f64,
}

impl RateVector {
    /// The nominal drift: slow O2 and power drain, a little heat build-up.
    pub fn nominal() -> Self {
        Self {
            oxygen:      -0.05,
            power:       -0.1,
            integrity:   0.0,
            temperature: 0.01,
        }
    }
}

impl Default for RateVector {
    fn default() -> Self { Self::nominal() }
}

macro_rules! channel_accessors {
    ($ty:ty) => {
        impl $ty {
            pub fn get(&self, channel: Channel) -> f64 {
                match channel {
                    Channel::Oxygen      => self.oxygen,
                    Channel::Power       => self.power,
                    Channel::Integrity   => self.integrity,
                    Channel::Temperature => self.temperature,
                }
            }

            pub fn set(&mut self, channel: Channel, value: f64) {
                match channel {
                    Channel::Oxygen      => self.oxygen = value,
                    Channel::Power       => self.power = value,
                    Channel::Integrity   => self.integrity = value,
                    Channel::Temperature => self.temperature = value,
                }
            }
        }
    };
}

channel_accessors!(ResourceState);
channel_accessors!(RateVector);

impl ResourceState {
    /// Saturate every channel into its domain.
    pub fn clamped(mut self) -> Self {
        for channel in Channel::ALL {
            self.set(channel, channel.clamp(self.get(channel)));
        }
        self
    }

    pub fn in_domain(&self) -> bool {
        Channel::ALL.iter().all(|c| {
            let (min, max) = c.domain();
            (min..=max).contains(&self.get(*c))
        })
    }
}

/// Advance one tick: `next[c] = clamp(state[c] + rates[c])` for every channel.
pub fn tick(state: &ResourceState, rates: &RateVector) -> ResourceState {
    let mut next = *state;
    for channel in Channel::ALL {
        next.set(channel, channel.clamp(state.get(channel) + rates.get(channel)));
    }
    next
}
