//! Resource engine tests: clamping, history window, pause.

use oceanus_core::{
    config::HabitatConfig,
    engine::SimEngine,
    resources::{RateVector, ResourceState},
    scenario::ScenarioKind,
};

fn build(run_id: &str) -> SimEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    SimEngine::build_test(run_id.to_string(), 42).expect("build test engine")
}

fn build_with(run_id: &str, config: HabitatConfig) -> SimEngine {
    SimEngine::build(run_id.to_string(), 42, config).expect("build engine")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn fresh_engine_starts_at_defaults_and_running() {
    let engine = build("fresh");
    assert_eq!(*engine.resources(), ResourceState::default());
    assert_eq!(*engine.rates(), RateVector::nominal());
    assert!(engine.history().is_empty());
    assert!(!engine.clock.paused);
    assert!(!engine.crisis().crisis_mode);
    assert_eq!(engine.active_scenario(), None);
}

#[test]
fn nominal_drift_after_ten_ticks() {
    let mut engine = build("drift");
    engine.run_ticks(10).unwrap();

    let r = engine.resources();
    assert!(close(r.oxygen, 99.5), "oxygen {}", r.oxygen);
    assert!(close(r.power, 99.0), "power {}", r.power);
    assert_eq!(r.integrity, 100.0);
    assert!(close(r.temperature, 20.1), "temperature {}", r.temperature);
}

#[test]
fn every_channel_stays_in_domain_under_extreme_rates() {
    let mut config = HabitatConfig::default_test();
    config.nominal_rates = RateVector { oxygen: 7.0, power: -9.0, integrity: 3.0, temperature: 11.0 };
    let mut engine = build_with("clamp-extreme", config);

    for _ in 0..50 {
        engine.tick().unwrap();
        assert!(engine.resources().in_domain(), "out of domain: {:?}", engine.resources());
    }
    let r = engine.resources();
    assert_eq!(r.oxygen, 100.0);
    assert_eq!(r.power, 0.0);
    assert_eq!(r.integrity, 100.0);
    assert_eq!(r.temperature, 150.0);
}

#[test]
fn hull_breach_vents_oxygen_down_to_zero_and_no_further() {
    let mut engine = build("clamp-hull");
    engine.trigger_scenario(ScenarioKind::Hull).unwrap();

    for _ in 0..80 {
        engine.tick().unwrap();
        assert!(engine.resources().in_domain());
    }
    assert_eq!(engine.resources().oxygen, 0.0);
    assert_eq!(engine.resources().temperature, -50.0);
}

#[test]
fn history_keeps_the_most_recent_thirty_in_order() {
    let mut engine = build("history-bound");
    engine.run_ticks(45).unwrap();

    let history = engine.history();
    assert_eq!(history.len(), 30);
    let ticks: Vec<u64> = history.iter().map(|s| s.tick).collect();
    assert_eq!(ticks, (16..=45).collect::<Vec<u64>>());

    let latest = history.latest().unwrap();
    assert_eq!(latest.oxygen, engine.resources().oxygen);
    assert_eq!(latest.timestamp, "00:00:00");
}

#[test]
fn history_grows_one_sample_per_tick_below_the_bound() {
    let mut engine = build("history-grow");
    for expected in 1..=30 {
        engine.tick().unwrap();
        assert_eq!(engine.history().len(), expected);
    }
}

#[test]
fn paused_engine_does_not_advance() {
    let mut engine = build("pause");
    engine.run_ticks(3).unwrap();
    let before = *engine.resources();

    engine.pause().unwrap();
    assert_eq!(engine.run_ticks(5).unwrap(), 0);
    assert!(engine.tick().unwrap().is_empty());
    assert_eq!(engine.clock.current_tick, 3);
    assert_eq!(engine.history().len(), 3);
    assert_eq!(*engine.resources(), before);

    assert!(engine.toggle_running().unwrap());
    assert_eq!(engine.run_ticks(2).unwrap(), 2);
    assert_eq!(engine.history().len(), 5);
}

#[test]
fn operator_actions_still_apply_while_paused() {
    let mut engine = build("pause-actions");
    engine.pause().unwrap();
    engine.trigger_scenario(ScenarioKind::Ice).unwrap();

    assert_eq!(engine.resources().integrity, 85.0);
    assert_eq!(engine.rates().integrity, -0.5);
    assert_eq!(engine.clock.current_tick, 0);
}
