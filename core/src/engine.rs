//! The simulation engine: resource state, crisis latch, operator actions.
//!
//! TICK ORDER (fixed, never reordered):
//!   1. Queued commands due at this tick
//!   2. Resource step: clamp(state + rates) for every channel
//!   3. History append (bounded, oldest evicted)
//!   4. Crisis check (skipped while a crisis is latched)
//!   5. Observer subsystems (telemetry)
//!
//! RULES:
//!   - A tick is one indivisible `&mut self` call; nothing interleaves.
//!   - While paused, tick() does nothing: no state, history or clock change.
//!   - Only the CrisisController mutates crisis state; only reset()
//!     touches both the resources and the latch.
//!   - All randomness flows through the RngBank, and only telemetry uses it.
//!   - All state changes are recorded in the session event log.

use crate::{
    alert::{CrisisController, CrisisState},
    clock::{FixedWallClock, SimClock, SimSpeed, SystemWallClock, WallClock},
    command::{OperatorAction, PlayerCommand, QueuedCommand},
    config::HabitatConfig,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    history::{History, HistorySample},
    readout,
    resources::{self, Channel, RateVector, ResourceState},
    rng::{RngBank, SubsystemSlot},
    scenario::{self, ScenarioKind},
    snapshot::{SimSnapshot, SNAPSHOT_INTERVAL},
    store::SimStore,
    subsystem::SimSubsystem,
    telemetry_subsystem::{TelemetryReadings, TelemetrySubsystem},
    types::{EntityId, RunId, Tick},
    view::DashboardView,
};

pub struct SimEngine {
    pub run_id:      RunId,
    pub clock:       SimClock,
    pub rng_bank:    RngBank,
    config:          HabitatConfig,
    resources:       ResourceState,
    rates:           RateVector,
    history:         History,
    crisis:          CrisisController,
    active_scenario: Option<ScenarioKind>,
    pending:         Vec<QueuedCommand>,
    subsystems:      Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    wall_clock:      Box<dyn WallClock>,
    store:           SimStore,
}

impl SimEngine {
    /// Bare engine: no subsystems, system wall clock.
    /// The store must already be migrated and hold the run row.
    pub fn new(run_id: RunId, seed: u64, config: HabitatConfig, store: SimStore) -> SimResult<Self> {
        config.validate()?;
        let engine = Self {
            clock:           SimClock::new(run_id.clone(), config.tick_period_ms),
            rng_bank:        RngBank::new(seed),
            resources:       config.initial_resources,
            rates:           config.nominal_rates,
            history:         History::new(config.history_length),
            crisis:          CrisisController::new(config.thresholds.clone()),
            active_scenario: None,
            pending:         Vec::new(),
            subsystems:      Vec::new(),
            wall_clock:      Box::new(SystemWallClock),
            store,
            config,
            run_id,
        };
        engine.record("engine", 0, &[SimEvent::RunInitialized {
            run_id: engine.run_id.clone(),
            seed,
        }])?;
        Ok(engine)
    }

    /// Build a fully wired engine on a fresh in-memory session store.
    /// Call this instead of new() + manual register() calls.
    pub fn build(run_id: RunId, seed: u64, config: HabitatConfig) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;

        let telemetry = TelemetrySubsystem::new(config.telemetry.clone());
        let mut engine = SimEngine::new(run_id, seed, config, store)?;
        engine.register(SubsystemSlot::Telemetry, Box::new(telemetry));
        Ok(engine)
    }

    /// Fully wired engine with default config and a fixed `00:00:00` wall clock.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Ok(Self::build(run_id, seed, HabitatConfig::default_test())?
            .with_wall_clock(Box::new(FixedWallClock::new("00:00:00"))))
    }

    pub fn with_wall_clock(mut self, wall_clock: Box<dyn WallClock>) -> Self {
        self.wall_clock = wall_clock;
        self
    }

    /// Register an observer subsystem. Call in the documented order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    // ── Tick ───────────────────────────────────────────────────

    /// Advance one tick. While paused, only commands due on the next tick
    /// run; if none of them resumes the clock, nothing else changes.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        if self.clock.paused {
            let next_tick = self.clock.current_tick + 1;
            for queued in self.take_due_commands(next_tick) {
                self.dispatch(queued.command_id, &queued.command)?;
            }
            if self.clock.paused {
                return Ok(vec![]);
            }
        }

        let current_tick = self.clock.advance();
        let mut tick_events = vec![SimEvent::TickStarted { tick: current_tick }];
        self.record("engine", current_tick, &tick_events)?;

        for queued in self.take_due_commands(current_tick) {
            self.dispatch(queued.command_id, &queued.command)?;
        }

        let next = resources::tick(&self.resources, &self.rates);
        self.resources = next;
        self.history.push(HistorySample::new(
            current_tick,
            self.wall_clock.time_label(),
            &next,
        ));
        let mut step_events = vec![SimEvent::ResourcesUpdated {
            tick:        current_tick,
            oxygen:      next.oxygen,
            power:       next.power,
            integrity:   next.integrity,
            temperature: next.temperature,
        }];

        if let Some(alert) = self.crisis.evaluate_tick(&next) {
            log::warn!("tick={current_tick} crisis latched: {}", alert.message());
            step_events.push(SimEvent::ThresholdBreached {
                tick:    current_tick,
                alert,
                message: alert.message().to_string(),
            });
        }
        self.record("engine", current_tick, &step_events)?;
        tick_events.extend(step_events);

        for (slot, subsystem) in &mut self.subsystems {
            let mut rng = self.rng_bank.for_subsystem_at_tick(*slot, current_tick);
            let new_events = subsystem.update(
                current_tick,
                &tick_events,
                self.crisis.state(),
                &mut rng,
            )?;
            record_to(&self.store, &self.run_id, subsystem.name(), current_tick, &new_events)?;
            tick_events.extend(new_events);
        }

        let completed = SimEvent::TickCompleted { tick: current_tick };
        self.record("engine", current_tick, std::slice::from_ref(&completed))?;
        tick_events.push(completed);

        log::debug!(
            "tick={current_tick} o2={:.2} power={:.2} integrity={:.2} temp={:.2} crisis={}",
            next.oxygen,
            next.power,
            next.integrity,
            next.temperature,
            self.crisis.in_crisis()
        );

        if current_tick.is_multiple_of(SNAPSHOT_INTERVAL) {
            self.take_snapshot(current_tick)?;
        }

        Ok(tick_events)
    }

    /// Attempt n ticks. Paused engines stay put.
    /// Returns the number of ticks actually advanced.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<u64> {
        let start = self.clock.current_tick;
        for _ in 0..n {
            let before = self.clock.current_tick;
            self.tick()?;
            if self.clock.current_tick == before {
                break;
            }
        }
        Ok(self.clock.current_tick - start)
    }

    // ── Operator actions ───────────────────────────────────────

    pub fn pause(&mut self) -> SimResult<()> {
        if !self.clock.paused {
            self.clock.pause();
            log::info!("tick={} simulation paused", self.clock.current_tick);
            self.record_action(SimEvent::SimulationPaused { tick: self.clock.current_tick })?;
        }
        Ok(())
    }

    pub fn resume(&mut self) -> SimResult<()> {
        if self.clock.paused {
            self.clock.resume();
            log::info!("tick={} simulation resumed", self.clock.current_tick);
            self.record_action(SimEvent::SimulationResumed { tick: self.clock.current_tick })?;
        }
        Ok(())
    }

    /// Run/pause toggle. Returns whether the engine is now running.
    pub fn toggle_running(&mut self) -> SimResult<bool> {
        if self.clock.paused {
            self.resume()?;
        } else {
            self.pause()?;
        }
        Ok(!self.clock.paused)
    }

    pub fn set_speed(&mut self, speed: SimSpeed) -> SimResult<()> {
        self.clock.set_speed(speed);
        self.record_action(SimEvent::SpeedChanged { tick: self.clock.current_tick, speed })
    }

    /// Inject a chaos scenario. Returns whether it raised the crisis alert;
    /// the rate changes apply either way.
    pub fn trigger_scenario(&mut self, kind: ScenarioKind) -> SimResult<bool> {
        let effect = self.config.scenarios.effect(kind);
        let alert_raised = self.crisis.latch(&effect.alert_message);
        self.active_scenario = Some(kind);
        scenario::apply_scenario(effect, &mut self.resources, &mut self.rates);

        log::info!(
            "tick={} scenario {kind} triggered (alert raised: {alert_raised})",
            self.clock.current_tick
        );
        self.record_action(SimEvent::ScenarioTriggered {
            tick: self.clock.current_tick,
            scenario: kind,
            alert_raised,
        })?;
        Ok(alert_raised)
    }

    /// Name-based variant for string inputs; unknown names are errors.
    pub fn trigger_scenario_named(&mut self, name: &str) -> SimResult<bool> {
        self.trigger_scenario(name.parse()?)
    }

    /// Nudge one channel's rate toward recovery. Returns the new rate.
    pub fn stabilize(&mut self, channel: Channel) -> SimResult<f64> {
        let old_rate = self.rates.get(channel);
        let new_rate = scenario::stabilized_rate(
            channel,
            &self.resources,
            &self.rates,
            &self.config.nominal_rates,
            &self.config.recovery,
        );
        self.rates.set(channel, new_rate);

        log::info!(
            "tick={} stabilize {channel}: rate {old_rate:+.3} -> {new_rate:+.3}",
            self.clock.current_tick
        );
        self.record_action(SimEvent::ChannelStabilized {
            tick: self.clock.current_tick,
            channel,
            old_rate,
            new_rate,
        })?;
        Ok(new_rate)
    }

    /// Back to nominal: clears the crisis, restores resources, rates and
    /// history, and shows the informational stabilized message.
    pub fn reset(&mut self) -> SimResult<()> {
        let message = self.config.scenarios.reset_message.clone();
        self.crisis.announce_reset(&message);
        self.active_scenario = None;
        self.resources = self.config.initial_resources;
        self.rates = self.config.nominal_rates;
        self.history.clear();

        log::info!("tick={} simulation reset", self.clock.current_tick);
        self.record_action(SimEvent::SimulationReset {
            tick: self.clock.current_tick,
            message,
        })
    }

    /// Hide the alert surface without clearing crisis mode.
    /// Returns whether an alert was visible.
    pub fn acknowledge_alert(&mut self) -> SimResult<bool> {
        let was_visible = self.crisis.acknowledge();
        if was_visible {
            self.record_action(SimEvent::AlertAcknowledged { tick: self.clock.current_tick })?;
        }
        Ok(was_visible)
    }

    // ── Commands ───────────────────────────────────────────────

    /// Validate and apply a command right away. Returns its id.
    pub fn submit(&mut self, command: &PlayerCommand) -> SimResult<EntityId> {
        let command_id = uuid::Uuid::new_v4().to_string();
        self.dispatch(command_id.clone(), command)?;
        Ok(command_id)
    }

    /// Validate a command now and hold it until the start of tick `due_at`.
    pub fn queue(&mut self, command: PlayerCommand, due_at: Tick) -> SimResult<EntityId> {
        OperatorAction::try_from(&command)?;
        let command_id = uuid::Uuid::new_v4().to_string();
        self.pending.push(QueuedCommand {
            run_id: self.run_id.clone(),
            due_at,
            command_id: command_id.clone(),
            command,
        });
        Ok(command_id)
    }

    pub fn pending_commands(&self) -> &[QueuedCommand] {
        &self.pending
    }

    fn take_due_commands(&mut self, tick: Tick) -> Vec<QueuedCommand> {
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|q| q.due_at <= tick);
        self.pending = later;
        due
    }

    fn dispatch(&mut self, command_id: EntityId, command: &PlayerCommand) -> SimResult<()> {
        let action = OperatorAction::try_from(command)?;
        self.record_action(SimEvent::PlayerCommandReceived {
            tick: self.clock.current_tick,
            command_id,
            command_type: command.command_type().to_string(),
        })?;
        match action {
            OperatorAction::Pause                 => self.pause(),
            OperatorAction::Resume                => self.resume(),
            OperatorAction::SetSpeed(speed)       => self.set_speed(speed),
            OperatorAction::TriggerScenario(kind) => self.trigger_scenario(kind).map(|_| ()),
            OperatorAction::Stabilize(channel)    => self.stabilize(channel).map(|_| ()),
            OperatorAction::Reset                 => self.reset(),
            OperatorAction::AcknowledgeAlert      => self.acknowledge_alert().map(|_| ()),
        }
    }

    // ── Read access ────────────────────────────────────────────

    pub fn resources(&self) -> &ResourceState { &self.resources }
    pub fn rates(&self) -> &RateVector { &self.rates }
    pub fn history(&self) -> &History { &self.history }
    pub fn crisis(&self) -> &CrisisState { self.crisis.state() }
    pub fn active_scenario(&self) -> Option<ScenarioKind> { self.active_scenario }
    pub fn config(&self) -> &HabitatConfig { &self.config }

    /// The telemetry subsystem's latest readings, if it is registered.
    pub fn telemetry(&self) -> Option<&TelemetryReadings> {
        self.subsystems.iter().find_map(|(_, sub)| {
            sub.as_any()
                .downcast_ref::<TelemetrySubsystem>()
                .map(|t| &t.state)
        })
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            tick:            self.clock.current_tick,
            paused:          self.clock.paused,
            speed:           self.clock.speed,
            tick_period_ms:  self.clock.tick_period_ms,
            resources:       self.resources,
            rates:           self.rates,
            history:         self.history.to_vec(),
            crisis:          self.crisis.state().clone(),
            active_scenario: self.active_scenario,
            readouts:        readout::readouts(&self.resources, &self.rates, self.active_scenario),
            telemetry:       self.telemetry().cloned(),
        }
    }

    // ── Session log and snapshots ──────────────────────────────

    /// Events recorded at `tick`, in emission order.
    pub fn store_events_for_tick(&self, tick: Tick) -> SimResult<Vec<EventLogEntry>> {
        self.store.events_for_tick(&self.run_id, tick)
    }

    pub fn store_event_count(&self, event_type: &str) -> SimResult<i64> {
        self.store.event_count(&self.run_id, event_type)
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            run_id:          self.run_id.clone(),
            tick:            self.clock.current_tick,
            clock:           self.clock.clone(),
            resources:       self.resources,
            rates:           self.rates,
            crisis:          self.crisis.state().clone(),
            active_scenario: self.active_scenario,
        }
    }

    /// Latest stored snapshot at or before `tick`.
    pub fn stored_snapshot(&self, tick: Tick) -> SimResult<Option<SimSnapshot>> {
        match self.store.latest_snapshot_before(&self.run_id, tick)? {
            Some((_, json)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Rewind to a snapshot. History restarts empty, and log rows and
    /// snapshots after the snapshot tick are dropped so replay starts clean.
    pub fn restore(&mut self, snapshot: &SimSnapshot) -> SimResult<()> {
        self.store.truncate_after(&self.run_id, snapshot.tick)?;
        self.clock = snapshot.clock.clone();
        self.resources = snapshot.resources.clamped();
        self.rates = snapshot.rates;
        self.crisis.restore(snapshot.crisis.clone());
        self.active_scenario = snapshot.active_scenario;
        self.history.clear();
        log::info!("restored snapshot at tick {}", snapshot.tick);
        Ok(())
    }

    fn take_snapshot(&self, tick: Tick) -> SimResult<()> {
        let json = serde_json::to_string(&self.snapshot())?;
        self.store.save_snapshot(&self.run_id, tick, &json)?;
        log::debug!("Snapshot saved at tick {tick}");
        Ok(())
    }

    fn record_action(&self, event: SimEvent) -> SimResult<()> {
        self.record("operator", self.clock.current_tick, &[event])
    }

    fn record(&self, subsystem: &str, tick: Tick, events: &[SimEvent]) -> SimResult<()> {
        record_to(&self.store, &self.run_id, subsystem, tick, events)
    }
}

fn record_to(
    store: &SimStore,
    run_id: &str,
    subsystem: &str,
    tick: Tick,
    events: &[SimEvent],
) -> SimResult<()> {
    for event in events {
        let entry = EventLogEntry {
            id:         None,
            run_id:     run_id.to_string(),
            tick,
            subsystem:  subsystem.to_string(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        };
        store.append_event(&entry)?;
    }
    Ok(())
}
