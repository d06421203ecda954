//! Bounded resource history, oldest sample first.

use crate::{resources::ResourceState, types::Tick};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Immutable snapshot of the resources right after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub tick:        Tick,
    /// Wall-clock time of day, `HH:MM:SS`.
    pub timestamp:   String,
    pub oxygen:      f64,
    pub power:       f64,
    pub integrity:   f64,
    pub temperature: f64,
}

impl HistorySample {
    pub fn new(tick: Tick, timestamp: String, state: &ResourceState) -> Self {
        Self {
            tick,
            timestamp,
            oxygen:      state.oxygen,
            power:       state.power,
            integrity:   state.integrity,
            temperature: state.temperature,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    capacity: usize,
    samples:  VecDeque<HistorySample>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append a sample, evicting from the front past capacity.
    pub fn push(&mut self, sample: HistorySample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<HistorySample> {
        self.samples.iter().cloned().collect()
    }
}
