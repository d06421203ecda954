//! Simulation clock: tick counter, speed control, and pause.
//!
//! Also home of the wall-clock seam: history samples are labelled with a
//! time of day, and that label comes from a `WallClock` so tests never
//! depend on the real time.

use crate::types::{RunId, Tick};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub run_id:         RunId,
    pub current_tick:   Tick,
    pub speed:          SimSpeed,
    pub paused:         bool,
    pub tick_period_ms: u64,
}

impl SimClock {
    /// A fresh clock starts running, matching the dashboard's initial state.
    pub fn new(run_id: RunId, tick_period_ms: u64) -> Self {
        Self {
            run_id,
            current_tick: 0,
            speed: SimSpeed::Normal,
            paused: false,
            tick_period_ms,
        }
    }

    /// Advance one tick. Returns the new tick number.
    /// Panics if called while paused; callers must check.
    pub fn advance(&mut self) -> Tick {
        assert!(!self.paused, "advance() called on paused clock");
        self.current_tick += 1;
        self.current_tick
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }

    pub fn set_speed(&mut self, speed: SimSpeed) {
        self.speed = speed;
    }

    /// Real time between two ticks at the current speed.
    pub fn real_interval(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms / self.speed.multiplier())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimSpeed {
    Normal,       // 1 tick per period
    Accelerated,  // 2 ticks per period
    FastForward,  // 5 ticks per period
}

impl SimSpeed {
    pub fn multiplier(&self) -> u64 {
        match self {
            SimSpeed::Normal      => 1,
            SimSpeed::Accelerated => 2,
            SimSpeed::FastForward => 5,
        }
    }
}

/// Source of the time-of-day label stamped on each history sample.
pub trait WallClock: Send {
    fn time_label(&self) -> String;
}

/// Local time of day, `HH:MM:SS`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn time_label(&self) -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }
}

/// Always returns the same label.
#[derive(Debug, Clone)]
pub struct FixedWallClock(pub String);

impl FixedWallClock {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl WallClock for FixedWallClock {
    fn time_label(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_running_at_tick_zero() {
        let clock = SimClock::new("run".into(), 1000);
        assert!(!clock.paused);
        assert_eq!(clock.current_tick, 0);
    }

    #[test]
    fn speed_shortens_real_interval() {
        let mut clock = SimClock::new("run".into(), 1000);
        assert_eq!(clock.real_interval(), Duration::from_millis(1000));
        clock.set_speed(SimSpeed::FastForward);
        assert_eq!(clock.real_interval(), Duration::from_millis(200));
    }

    #[test]
    #[should_panic(expected = "paused clock")]
    fn advancing_a_paused_clock_panics() {
        let mut clock = SimClock::new("run".into(), 1000);
        clock.pause();
        clock.advance();
    }
}
