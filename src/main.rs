//! Wham-O main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter     SimDriverStation   LogEventSink         │
//! │  (Input+Actuator)    (ModePort)         (EventSink)          │
//! │  ConfigFileAdapter                                           │
//! │  (ConfigPort)                                                │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │           RobotService (pure logic)                    │  │
//! │  │  Inputs · Interlock · Gear · Arm · Safety              │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  ControlLoop (period, motor safety, stats) · TimedDrive      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use whamo::adapters::config_file::ConfigFileAdapter;
use whamo::adapters::log_sink::LogEventSink;
use whamo::adapters::sim::{Scenario, SimDevices, SimDriverStation};
use whamo::app::autonomous::TimedDrive;
use whamo::app::control_loop::ControlLoop;
use whamo::app::ports::ConfigPort;
use whamo::app::service::RobotService;
use whamo::config::RobotConfig;
use whamo::error::ConfigError;

/// Wham-O robot control loop (simulated hardware)
#[derive(Parser, Debug)]
#[command(name = "whamo")]
#[command(version)]
#[command(about = "Competition robot control loop against a simulated robot")]
struct Args {
    /// Robot configuration file.
    #[arg(short, long, default_value = "robot.toml")]
    config: PathBuf,

    /// JSON-lines operator scenario to replay.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Stop operator control after this many cycles.
    #[arg(long)]
    cycles: Option<u64>,

    /// Go straight to operator control.
    #[arg(long)]
    skip_autonomous: bool,

    /// Write the effective configuration to --config and exit.
    #[arg(long)]
    write_config: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config_port = ConfigFileAdapter::new(&args.config);
    let config = load_config(&config_port)?;

    if args.write_config {
        config_port
            .save(&config)
            .with_context(|| format!("writing {}", args.config.display()))?;
        return Ok(());
    }

    info!("╔══════════════════════════════════════╗");
    info!("║  2013 {:<31}║", config.robot_name);
    info!("║  whamo v{:<29}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── Shutdown signal ───────────────────────────────────────
    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        s.store(true, Ordering::SeqCst);
    })
    .context("installing Ctrl-C handler")?;

    // ── Robot assembly ────────────────────────────────────────
    let devices = SimDevices::new();
    let mut hw = devices.hardware(config.buttons.clone());
    let mut sink = LogEventSink::new();

    let mut driver_station = SimDriverStation::new(devices, config.buttons.clone(), stop);
    if let Some(path) = &args.scenario {
        let scenario = Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?;
        info!(
            "Scenario: {} frames, {} cycles",
            scenario.frames().len(),
            scenario.total_cycles()
        );
        driver_station = driver_station.with_scenario(scenario);
    }
    if let Some(cycles) = args.cycles {
        driver_station = driver_station.with_max_cycles(cycles);
    }
    if args.scenario.is_none() && args.cycles.is_none() {
        info!("No scenario or cycle limit; press Ctrl-C to end operator control");
    }

    let mut control_loop = ControlLoop::new(&config);
    let mut service = RobotService::new(&config);

    // ── Autonomous ────────────────────────────────────────────
    if !args.skip_autonomous {
        control_loop.run_autonomous(&TimedDrive::from_config(&config), &mut hw, &mut sink);
    }

    // ── Operator control ──────────────────────────────────────
    let stats =
        control_loop.run_operator_control(&mut service, &mut hw, &mut driver_station, &mut sink);

    info!(
        "Shutdown: {} cycles, {} overruns, mean {} us",
        stats.cycles,
        stats.overruns,
        stats.mean_busy().as_micros()
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
}

/// Load config, falling back to defaults when the file does not exist.
fn load_config(port: &ConfigFileAdapter) -> Result<RobotConfig> {
    match port.load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound) => {
            warn!(
                "No config at {}, using defaults",
                port.path().display()
            );
            Ok(RobotConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("loading {}", port.path().display())),
    }
}
