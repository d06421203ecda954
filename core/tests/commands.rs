//! Command surface tests: submit, queue, validation.

use oceanus_core::{
    clock::SimSpeed,
    command::PlayerCommand,
    engine::SimEngine,
    error::SimError,
    resources::Channel,
    scenario::ScenarioKind,
};

fn build(run_id: &str) -> SimEngine {
    SimEngine::build_test(run_id.to_string(), 42).expect("build test engine")
}

#[test]
fn submitted_commands_are_logged_and_applied() {
    let mut engine = build("submit");
    let id = engine
        .submit(&PlayerCommand::TriggerScenario { scenario: "reactor-scram".into() })
        .unwrap();
    assert!(!id.is_empty());
    assert_eq!(engine.active_scenario(), Some(ScenarioKind::Reactor));

    engine.submit(&PlayerCommand::Stabilize { channel: "power".into() }).unwrap();
    assert!((engine.rates().power - (-1.5)).abs() < 1e-9);

    engine.submit(&PlayerCommand::AcknowledgeAlert).unwrap();
    assert!(!engine.crisis().alert_visible);

    assert_eq!(engine.store_event_count("player_command_received").unwrap(), 3);
}

#[test]
fn malformed_names_are_errors_and_leave_no_trace() {
    let mut engine = build("malformed");

    let err = engine
        .submit(&PlayerCommand::Stabilize { channel: "pressure".into() })
        .unwrap_err();
    assert!(matches!(err, SimError::UnknownChannel { .. }));

    let err = engine
        .queue(PlayerCommand::TriggerScenario { scenario: "kraken".into() }, 5)
        .unwrap_err();
    assert!(matches!(err, SimError::UnknownScenario { .. }));

    assert!(engine.pending_commands().is_empty());
    assert_eq!(engine.store_event_count("player_command_received").unwrap(), 0);
}

#[test]
fn queued_scenario_fires_at_the_start_of_its_tick() {
    let mut engine = build("queued");
    engine
        .queue(PlayerCommand::TriggerScenario { scenario: "hull".into() }, 5)
        .unwrap();

    engine.run_ticks(4).unwrap();
    assert_eq!(engine.active_scenario(), None);
    assert_eq!(engine.pending_commands().len(), 1);

    engine.tick().unwrap();
    assert_eq!(engine.active_scenario(), Some(ScenarioKind::Hull));
    assert!(engine.pending_commands().is_empty());
    // Four nominal ticks, then the breach rate already applies on tick 5.
    let expected = 100.0 - 4.0 * 0.05 - 3.0;
    assert!((engine.resources().oxygen - expected).abs() < 1e-6);
}

#[test]
fn queued_pause_stops_a_batch_run() {
    let mut engine = build("queued-pause");
    engine.queue(PlayerCommand::Pause, 3).unwrap();

    assert_eq!(engine.run_ticks(10).unwrap(), 3);
    assert!(engine.clock.paused);

    engine.submit(&PlayerCommand::Resume).unwrap();
    assert_eq!(engine.run_ticks(2).unwrap(), 2);
}

#[test]
fn queued_resume_wakes_a_paused_clock() {
    let mut engine = build("queued-resume");
    engine.run_ticks(2).unwrap();
    engine.pause().unwrap();
    engine.queue(PlayerCommand::Resume, 3).unwrap();

    let events = engine.tick().unwrap();
    assert!(!events.is_empty(), "resumed tick should run");
    assert!(!engine.clock.paused);
    assert_eq!(engine.clock.current_tick, 3);
    assert!(engine.pending_commands().is_empty());
}

#[test]
fn commands_due_later_wait_while_paused() {
    let mut engine = build("paused-queue");
    engine.pause().unwrap();
    engine.queue(PlayerCommand::Resume, 4).unwrap();

    assert_eq!(engine.run_ticks(10).unwrap(), 0);
    assert!(engine.clock.paused);
    assert_eq!(engine.pending_commands().len(), 1);
}

#[test]
fn set_speed_changes_real_interval_only() {
    let mut engine = build("speed");
    engine.submit(&PlayerCommand::SetSpeed { speed: SimSpeed::Accelerated }).unwrap();
    assert_eq!(engine.clock.speed, SimSpeed::Accelerated);
    assert_eq!(engine.clock.real_interval().as_millis(), 500);

    engine.run_ticks(1).unwrap();
    assert_eq!(engine.clock.current_tick, 1);
}

#[test]
fn reset_command_round_trips_through_json() {
    let mut engine = build("json-reset");
    engine.stabilize(Channel::Power).unwrap();

    let cmd: PlayerCommand = serde_json::from_str(r#"{ "cmd": "reset" }"#).unwrap();
    engine.submit(&cmd).unwrap();
    assert!((engine.rates().power - (-0.1)).abs() < 1e-12);
}
