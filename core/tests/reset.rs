//! Reset tests.

use oceanus_core::{
    engine::SimEngine,
    resources::{RateVector, ResourceState},
    scenario::ScenarioKind,
};

const RESET_MSG: &str = "Systems stabilized. Returning to nominal operation.";

fn build(run_id: &str) -> SimEngine {
    SimEngine::build_test(run_id.to_string(), 42).expect("build test engine")
}

fn assert_nominal(engine: &SimEngine) {
    assert_eq!(*engine.resources(), ResourceState::default());
    assert_eq!(*engine.rates(), RateVector::nominal());
    assert!(engine.history().is_empty());
    assert!(!engine.crisis().crisis_mode);
    assert_eq!(engine.active_scenario(), None);
}

#[test]
fn reset_restores_defaults_after_a_crisis() {
    let mut engine = build("reset-crisis");
    engine.trigger_scenario(ScenarioKind::Ice).unwrap();
    engine.run_ticks(25).unwrap();
    assert!(engine.crisis().crisis_mode);

    engine.reset().unwrap();
    assert_nominal(&engine);
    assert!(engine.crisis().alert_visible);
    assert_eq!(engine.crisis().alert_message.as_deref(), Some(RESET_MSG));
}

#[test]
fn reset_twice_is_idempotent() {
    let mut engine = build("reset-twice");
    engine.trigger_scenario(ScenarioKind::Hull).unwrap();
    engine.run_ticks(12).unwrap();

    engine.reset().unwrap();
    let first = engine.view();
    engine.reset().unwrap();
    let second = engine.view();

    assert_nominal(&engine);
    assert_eq!(first.resources, second.resources);
    assert_eq!(first.rates, second.rates);
    assert_eq!(first.history, second.history);
    assert_eq!(first.crisis.crisis_mode, second.crisis.crisis_mode);
    assert_eq!(first.crisis.alert_message, second.crisis.alert_message);
}

#[test]
fn reset_keeps_clock_and_pause_state() {
    let mut engine = build("reset-clock");
    engine.run_ticks(8).unwrap();
    engine.pause().unwrap();
    engine.reset().unwrap();

    assert_eq!(engine.clock.current_tick, 8);
    assert!(engine.clock.paused);
    assert_eq!(engine.store_event_count("simulation_reset").unwrap(), 1);
}
