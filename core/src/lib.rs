//! Oceanus Proxima habitat simulation core.
//!
//! A fixed-tick resource engine (oxygen, power, integrity, temperature)
//! with an edge-triggered crisis latch, chaos scenarios and operator
//! recovery actions. Presentation lives elsewhere and consumes
//! `engine::SimEngine::view()`.

pub mod alert;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod readout;
pub mod resources;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod store;
pub mod subsystem;
pub mod telemetry_subsystem;
pub mod types;
pub mod view;

pub use engine::SimEngine;
pub use error::{SimError, SimResult};
