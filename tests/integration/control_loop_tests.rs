//! ControlLoop tests: mode signal, shutdown, autonomous, motor safety,
//! and a full run against the simulated robot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use whamo::adapters::sim::{Scenario, ScenarioFrame, SimDevices, SimDriverStation};
use whamo::app::autonomous::TimedDrive;
use whamo::app::control_loop::ControlLoop;
use whamo::app::events::AppEvent;
use whamo::app::ports::AxisId;
use whamo::app::service::RobotService;
use whamo::config::RobotConfig;
use whamo::error::SafetyFault;
use whamo::fsm::StateId;
use whamo::sensors::ButtonId;

use super::mock_hw::{ActuatorCall, CountdownMode, MockHardware, RecordingSink};

fn no_sleep(_: Duration) {}

fn fast_loop(config: &RobotConfig) -> ControlLoop {
    ControlLoop::new(config).with_sleep(no_sleep)
}

// ── Operator control ──────────────────────────────────────────

#[test]
fn runs_until_mode_signal_drops() {
    let config = RobotConfig::default();
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut hw = MockHardware::new();
    let mut mode = CountdownMode::new(7);
    let mut sink = RecordingSink::new();

    let stats = cl.run_operator_control(&mut svc, &mut hw, &mut mode, &mut sink);

    assert_eq!(stats.cycles, 7);
    assert_eq!(svc.cycle_count(), 7);
    // Seven grants plus the poll that ended the loop.
    assert_eq!(mode.polls, 8);
    assert!(!cl.watchdog_enabled());
}

#[test]
fn shutdown_stops_everything_and_reports_stats() {
    let config = RobotConfig::default();
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut hw = MockHardware::new();
    let mut mode = CountdownMode::new(3);
    let mut sink = RecordingSink::new();

    let stats = cl.run_operator_control(&mut svc, &mut hw, &mut mode, &mut sink);

    assert_eq!(hw.calls.last(), Some(&ActuatorCall::AllOff));
    assert_eq!(sink.events.first(), Some(&AppEvent::Started));
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped(stats)));
    assert_eq!(cl.stats(), stats);
}

#[test]
fn mode_off_at_entry_runs_no_cycles() {
    let config = RobotConfig::default();
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut hw = MockHardware::new();
    let mut mode = CountdownMode::new(0);
    let mut sink = RecordingSink::new();

    let stats = cl.run_operator_control(&mut svc, &mut hw, &mut mode, &mut sink);

    assert_eq!(stats.cycles, 0);
    assert_eq!(hw.count(&ActuatorCall::RegulatePressure), 0);
    assert_eq!(hw.calls.last(), Some(&ActuatorCall::AllOff));
}

// ── Motor safety ──────────────────────────────────────────────

fn slow_sleep(_: Duration) {
    std::thread::sleep(Duration::from_millis(120));
}

#[test]
fn late_cycles_trip_the_drive_watchdog() {
    let config = RobotConfig::default();
    let mut cl = ControlLoop::new(&config).with_sleep(slow_sleep);
    let mut svc = RobotService::new(&config);
    let mut hw = MockHardware::new();
    hw.set_axis(AxisId::DriveY, -1.0);
    let mut mode = CountdownMode::new(3);
    let mut sink = RecordingSink::new();

    cl.run_operator_control(&mut svc, &mut hw, &mut mode, &mut sink);

    // Cycle 1 has no prior feed; cycles 2 and 3 arrive late.
    assert_eq!(sink.count(|e| matches!(e, AppEvent::WatchdogExpired)), 2);
    let mask = SafetyFault::DriveWatchdogExpired.mask();
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::FaultDetected(m) if m & mask != 0))
    );

    // Only the on-time first cycle drives; the late ones hold zero.
    let drives: Vec<_> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::SetDrive { left, right } => Some((*left, *right)),
            _ => None,
        })
        .collect();
    assert_eq!(drives, vec![(-1.0, -1.0), (0.0, 0.0), (0.0, 0.0)]);
}

#[test]
fn prompt_cycles_never_trip_the_watchdog() {
    let config = RobotConfig::default();
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut hw = MockHardware::new();
    let mut mode = CountdownMode::new(20);
    let mut sink = RecordingSink::new();

    cl.run_operator_control(&mut svc, &mut hw, &mut mode, &mut sink);

    assert_eq!(sink.count(|e| matches!(e, AppEvent::WatchdogExpired)), 0);
    assert_eq!(svc.fault_flags(), 0);
}

// ── Autonomous ────────────────────────────────────────────────

#[test]
fn autonomous_drives_straight_then_stops() {
    let config = RobotConfig::default();
    let mut cl = fast_loop(&config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    cl.run_autonomous(&TimedDrive::from_config(&config), &mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::SetDrive {
                left: -0.5,
                right: -0.5
            },
            ActuatorCall::SetDrive {
                left: 0.0,
                right: 0.0
            },
        ]
    );
    assert_eq!(
        sink.events,
        vec![
            AppEvent::AutonomousStarted {
                speed: -0.5,
                duration_ms: 2000
            },
            AppEvent::AutonomousFinished,
        ]
    );
    assert!(!cl.watchdog_enabled());
}

#[test]
fn autonomous_waits_for_the_configured_duration() {
    let mut waited = Vec::new();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    TimedDrive::new(-0.25, Duration::from_millis(750)).run(&mut hw, &mut sink, |d| {
        waited.push(d)
    });

    assert_eq!(waited, vec![Duration::from_millis(750)]);
    assert_eq!(hw.drive(), (0.0, 0.0));
}

// ── Simulated robot ───────────────────────────────────────────

fn frame(pressed: &[ButtonId], cycles: u32) -> ScenarioFrame {
    ScenarioFrame {
        pressed: pressed.to_vec(),
        cycles,
        ..Default::default()
    }
}

#[test]
fn scripted_match_on_simulated_robot() {
    let config = RobotConfig::default();
    let devices = SimDevices::new();
    let mut hw = devices.hardware(config.buttons.clone());
    let scenario = Scenario::new(vec![
        frame(&[ButtonId::CollectorForward], 2),
        frame(&[ButtonId::CollectorForward, ButtonId::Shooter], 1),
        frame(&[], 1),
        frame(&[ButtonId::Shooter], 1),
        frame(&[], 3),
        ScenarioFrame {
            index_switch: true,
            ..Default::default()
        },
    ]);
    assert_eq!(scenario.total_cycles(), 9);

    let stop = Arc::new(AtomicBool::new(false));
    let mut ds = SimDriverStation::new(devices.clone(), config.buttons.clone(), stop)
        .with_scenario(scenario);
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut sink = RecordingSink::new();

    let stats = cl.run_operator_control(&mut svc, &mut hw, &mut ds, &mut sink);
    assert_eq!(stats.cycles, 9);
    assert_eq!(ds.cycles(), 9);

    let t = sink.telemetry();
    let row: Vec<(f32, f32, f32)> = t.iter().map(|t| (t.collector, t.shooter, t.indexer)).collect();
    assert_eq!(
        row,
        vec![
            (1.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            (0.0, -0.5, -0.5),
            (0.0, -0.5, -0.5),
            (0.0, -0.5, -0.5),
            (0.0, -0.5, -0.5),
            (0.0, 0.0, 0.0),
        ]
    );
    assert_eq!(svc.interlock_state(), StateId::Idle);

    // Shutdown left every output off.
    assert_eq!(devices.collector.output(), 0.0);
    assert_eq!(devices.shooter.output(), 0.0);
    assert!(!devices.compressor_relay.level());
}

#[test]
fn running_collector_is_stopped_when_operator_control_ends() {
    let config = RobotConfig::default();
    let devices = SimDevices::new();
    let mut hw = devices.hardware(config.buttons.clone());
    let stop = Arc::new(AtomicBool::new(false));
    let mut ds = SimDriverStation::new(devices.clone(), config.buttons.clone(), stop)
        .with_scenario(Scenario::new(vec![frame(&[ButtonId::CollectorForward], 3)]));
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut sink = RecordingSink::new();

    cl.run_operator_control(&mut svc, &mut hw, &mut ds, &mut sink);

    assert_eq!(svc.interlock_state(), StateId::CollectorRunning);
    assert_eq!(svc.last_outputs().motors.collector, 1.0);
    assert_eq!(devices.collector.output(), 0.0);
}

#[test]
fn stop_flag_ends_simulated_run() {
    let config = RobotConfig::default();
    let devices = SimDevices::new();
    let mut hw = devices.hardware(config.buttons.clone());
    let stop = Arc::new(AtomicBool::new(true));
    let mut ds = SimDriverStation::new(devices, config.buttons.clone(), stop.clone());
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut sink = RecordingSink::new();

    let stats = cl.run_operator_control(&mut svc, &mut hw, &mut ds, &mut sink);
    assert_eq!(stats.cycles, 0);
    assert!(stop.load(Ordering::SeqCst));
}

#[test]
fn cycle_limit_ends_simulated_run() {
    let config = RobotConfig::default();
    let devices = SimDevices::new();
    let mut hw = devices.hardware(config.buttons.clone());
    let stop = Arc::new(AtomicBool::new(false));
    let mut ds =
        SimDriverStation::new(devices.clone(), config.buttons.clone(), stop).with_max_cycles(5);
    let mut cl = fast_loop(&config);
    let mut svc = RobotService::new(&config);
    let mut sink = RecordingSink::new();

    let stats = cl.run_operator_control(&mut svc, &mut hw, &mut ds, &mut sink);
    assert_eq!(stats.cycles, 5);
    // Compressor ran with the tank not full, then shutdown stopped it.
    assert!(!devices.compressor_relay.level());
}
