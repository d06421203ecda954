//! Event log ordering and snapshot tests.

use oceanus_core::{config::HabitatConfig, engine::SimEngine, scenario::ScenarioKind};

fn build(run_id: &str) -> SimEngine {
    SimEngine::build_test(run_id.to_string(), 3).expect("build test engine")
}

fn types_at(engine: &SimEngine, tick: u64) -> Vec<String> {
    engine
        .store_events_for_tick(tick)
        .unwrap()
        .into_iter()
        .map(|e| e.event_type)
        .collect()
}

#[test]
fn run_initialized_is_logged_at_tick_zero() {
    let engine = build("init");
    assert_eq!(types_at(&engine, 0), vec!["run_initialized"]);
}

#[test]
fn tick_events_follow_the_fixed_order() {
    let mut engine = build("order");
    engine.run_ticks(2).unwrap();

    assert_eq!(
        types_at(&engine, 1),
        vec!["tick_started", "resources_updated", "tick_completed"]
    );
    assert_eq!(
        types_at(&engine, 2),
        vec!["tick_started", "resources_updated", "telemetry_updated", "tick_completed"]
    );
}

#[test]
fn breach_is_logged_between_update_and_completion() {
    let mut config = HabitatConfig::default_test();
    config.nominal_rates.integrity = -90.0;
    let mut engine = SimEngine::build("breach-order".into(), 3, config).unwrap();
    engine.tick().unwrap();

    assert_eq!(
        types_at(&engine, 1),
        vec!["tick_started", "resources_updated", "threshold_breached", "tick_completed"]
    );
}

#[test]
fn operator_actions_are_logged_at_the_current_tick() {
    let mut engine = build("operator-log");
    engine.run_ticks(3).unwrap();
    engine.trigger_scenario(ScenarioKind::Ice).unwrap();
    engine.reset().unwrap();

    let entries = engine.store_events_for_tick(3).unwrap();
    let operator: Vec<&str> = entries
        .iter()
        .filter(|e| e.subsystem == "operator")
        .map(|e| e.event_type.as_str())
        .collect();
    assert_eq!(operator, vec!["scenario_triggered", "simulation_reset"]);
}

#[test]
fn snapshot_every_thirty_ticks_restores_state() {
    let mut engine = build("snapshot");
    engine.trigger_scenario(ScenarioKind::Hull).unwrap();
    engine.run_ticks(35).unwrap();

    let snap = engine.stored_snapshot(35).unwrap().expect("snapshot at tick 30");
    assert_eq!(snap.tick, 30);
    assert_eq!(snap.active_scenario, Some(ScenarioKind::Hull));
    assert!(snap.crisis.crisis_mode);
    assert!(engine.stored_snapshot(29).unwrap().is_none());

    engine.restore(&snap).unwrap();
    assert_eq!(engine.clock.current_tick, 30);
    assert_eq!(*engine.resources(), snap.resources);
    assert!(engine.history().is_empty());
    assert!(types_at(&engine, 31).is_empty(), "rows past the snapshot are dropped");

    engine.run_ticks(5).unwrap();
    assert_eq!(engine.history().len(), 5);
    assert_eq!(
        types_at(&engine, 31),
        vec!["tick_started", "resources_updated", "tick_completed"],
        "replayed tick must hold a single timeline"
    );
    assert_eq!(engine.store_event_count("tick_started").unwrap(), 35);
}

#[test]
fn restore_drops_later_snapshots_and_breaches() {
    let mut config = HabitatConfig::default_test();
    config.nominal_rates.integrity = -2.0;
    let mut engine = SimEngine::build("rewind".into(), 3, config).unwrap();
    engine.run_ticks(65).unwrap();
    assert_eq!(engine.store_event_count("threshold_breached").unwrap(), 1);

    let snap = engine.stored_snapshot(30).unwrap().expect("snapshot at tick 30");
    engine.restore(&snap).unwrap();
    assert_eq!(engine.stored_snapshot(65).unwrap().map(|s| s.tick), Some(30));
    assert_eq!(engine.store_event_count("threshold_breached").unwrap(), 0);

    engine.run_ticks(35).unwrap();
    assert_eq!(engine.store_event_count("threshold_breached").unwrap(), 1);
}
