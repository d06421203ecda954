//! habitat-runner: headless driver for the Oceanus Proxima simulation.
//!
//! Usage:
//!   habitat-runner --seed 12345 --ticks 120
//!   habitat-runner --ticks 90 --scenario hull --scenario-at 10
//!   habitat-runner --config habitat.json --realtime
//!   habitat-runner --ipc-mode

use anyhow::Result;
use oceanus_core::{
    command::PlayerCommand,
    config::HabitatConfig,
    engine::SimEngine,
    resources::Channel,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Tick { count: u64 },
    Command { command: PlayerCommand },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 60u64);
    let scenario_at = parse_arg(&args, "--scenario-at", 1u64);
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let realtime = has_flag(&args, "--realtime");
    let scenario = string_arg(&args, "--scenario");

    let config = match string_arg(&args, "--config") {
        Some(path) => HabitatConfig::load(path)?,
        None => HabitatConfig::default(),
    };

    let run_id = format!("run-{seed}-{}", chrono::Utc::now().timestamp());
    let mut engine = SimEngine::build(run_id.clone(), seed, config)?;

    if let Some(name) = scenario {
        engine.queue(PlayerCommand::TriggerScenario { scenario: name.to_string() }, scenario_at)?;
    }

    if ipc_mode {
        return run_ipc_loop(&mut engine);
    }

    println!("Oceanus Proxima: habitat-runner");
    println!("  run_id:    {run_id}");
    println!("  seed:      {seed}");
    println!("  ticks:     {ticks}");
    println!("  scenario:  {}", scenario.unwrap_or("none"));
    println!("  realtime:  {realtime}");
    println!();

    if realtime {
        run_realtime(&mut engine, ticks)?;
    } else {
        engine.run_ticks(ticks)?;
    }
    print_summary(&engine)?;
    Ok(())
}

/// Fixed-period driver: one tick, then sleep the clock's interval.
fn run_realtime(engine: &mut SimEngine, ticks: u64) -> Result<()> {
    for _ in 0..ticks {
        engine.tick()?;
        let r = engine.resources();
        println!(
            "[{:>4}] O2 {:>6.2}%  PWR {:>6.2}%  INT {:>6.2}%  TEMP {:>7.2}C{}",
            engine.clock.current_tick,
            r.oxygen,
            r.power,
            r.integrity,
            r.temperature,
            if engine.crisis().crisis_mode { "  [CRISIS]" } else { "" }
        );
        std::thread::sleep(engine.clock.real_interval());
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Malformed IPC request: {e}");
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let outcome = match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => Ok(()),
            IpcRequest::Tick { count } => engine.run_ticks(count).map(|_| ()),
            IpcRequest::Command { command } => engine.submit(&command).map(|_| ()),
        };

        match outcome {
            Ok(()) => writeln!(stdout, "{}", serde_json::to_string(&engine.view())?)?,
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn print_summary(engine: &SimEngine) -> Result<()> {
    let crisis = engine.crisis();

    println!("=== RUN SUMMARY ===");
    println!("  final tick:     {}", engine.clock.current_tick);
    println!("  history:        {} samples", engine.history().len());
    println!("  scenario:       {}", engine.active_scenario().map_or("none".into(), |k| k.to_string()));
    println!("  crisis mode:    {}", crisis.crisis_mode);
    println!("  last alert:     {}", crisis.alert_message.as_deref().unwrap_or("-"));
    println!("  alerts raised:  {}", engine.store_event_count("threshold_breached")?);

    println!();
    println!("=== CHANNELS ===");
    for card in engine.view().readouts {
        let unit = if card.channel == Channel::Temperature { "C" } else { "%" };
        println!(
            "  {:<12} {:>7.2}{unit}  rate {:>+6.2}/tick  {:?}",
            card.channel.name(),
            card.value,
            card.rate,
            card.severity
        );
    }

    if let Some(t) = engine.telemetry() {
        println!();
        println!("=== TELEMETRY ===");
        println!(
            "  cores {:.0}/{:.0}  output {:.2} MW  cogeneration {}",
            t.thermodynamics.core_a_temp,
            t.thermodynamics.core_b_temp,
            t.thermodynamics.power_output_mw,
            t.thermodynamics.cogeneration_active
        );
        println!(
            "  ext pressure {:.2} MPa  O2 sat {:.1}%  water {:.0} L/h",
            t.external_pressure_mpa, t.o2_saturation, t.water_flow
        );
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
