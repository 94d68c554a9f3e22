//! RobotService cycle tests against mock hardware.

use whamo::app::events::AppEvent;
use whamo::app::ports::{AxisId, MotorId, Position, SolenoidId};
use whamo::app::service::RobotService;
use whamo::config::RobotConfig;
use whamo::control::arm::{ClawId, ClawState};
use whamo::control::gear::{GearShiftMode, GearState};
use whamo::error::SafetyFault;
use whamo::fsm::StateId;
use whamo::sensors::ButtonId;

use super::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

fn started(config: &RobotConfig) -> (RobotService, MockHardware, RecordingSink) {
    let mut svc = RobotService::new(config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, &mut sink);
    (svc, hw, sink)
}

fn default_started() -> (RobotService, MockHardware, RecordingSink) {
    started(&RobotConfig::default())
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_commands_low_gear_unlocked_claws_and_compressor() {
    let (_svc, hw, sink) = default_started();

    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::SetSolenoid {
                solenoid: SolenoidId::Shifter,
                position: Position::Reverse
            },
            ActuatorCall::SetSolenoid {
                solenoid: SolenoidId::GreenClaw,
                position: Position::Reverse
            },
            ActuatorCall::SetSolenoid {
                solenoid: SolenoidId::YellowClaw,
                position: Position::Reverse
            },
            ActuatorCall::StartCompressor,
        ]
    );
    assert_eq!(sink.events, vec![AppEvent::Started]);
}

#[test]
fn button_held_through_start_produces_no_edge() {
    let mut svc = RobotService::new(&RobotConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    hw.press(ButtonId::CollectorForward);
    svc.start(&mut hw, &mut sink);

    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::Idle);
    assert_eq!(hw.motor(MotorId::Collector), 0.0);

    // Releasing and pressing again is a real edge.
    hw.release(ButtonId::CollectorForward);
    svc.tick(&mut hw, &mut sink);
    hw.press(ButtonId::CollectorForward);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::CollectorRunning);
}

#[test]
fn every_cycle_writes_all_mechanisms_and_regulates_pressure() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.clear_calls();
    svc.tick(&mut hw, &mut sink);

    for motor in [
        MotorId::Collector,
        MotorId::Shooter,
        MotorId::Indexer,
        MotorId::Arm,
    ] {
        assert!(
            hw.calls
                .iter()
                .any(|c| matches!(c, ActuatorCall::SetMotor { motor: m, .. } if *m == motor)),
            "{motor:?} not written"
        );
    }
    assert_eq!(hw.count(&ActuatorCall::RegulatePressure), 1);
    assert_eq!(hw.calls.iter().filter(|c| matches!(c, ActuatorCall::SetDrive { .. })).count(), 1);
}

// ── Collector / shooter interlock ─────────────────────────────

#[test]
fn collector_shooter_sequence_end_to_end() {
    let (mut svc, mut hw, mut sink) = default_started();

    // Collector forward pressed.
    hw.press(ButtonId::CollectorForward);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::CollectorRunning);
    assert_eq!(hw.motor(MotorId::Collector), 1.0);
    assert_eq!(hw.motor(MotorId::Shooter), 0.0);

    // Shooter pressed while collecting: ignored.
    hw.press(ButtonId::Shooter);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::CollectorRunning);
    assert_eq!(hw.motor(MotorId::Shooter), 0.0);
    assert_eq!(hw.motor(MotorId::Indexer), 0.0);

    // Both released.
    hw.release(ButtonId::Shooter);
    hw.release(ButtonId::CollectorForward);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::Idle);
    assert_eq!(hw.motor(MotorId::Collector), 0.0);

    // Shooter pressed from idle.
    hw.press(ButtonId::Shooter);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::ShooterRunning);
    assert_eq!(hw.motor(MotorId::Shooter), -0.5);
    assert_eq!(hw.motor(MotorId::Indexer), -0.5);
    assert_eq!(hw.motor(MotorId::Collector), 0.0);

    // Releasing the shooter button does not stop it.
    hw.release(ButtonId::Shooter);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::ShooterRunning);

    // Index switch closes: back to idle.
    hw.press(ButtonId::IndexSwitch);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::Idle);
    assert_eq!(hw.motor(MotorId::Shooter), 0.0);
    assert_eq!(hw.motor(MotorId::Indexer), 0.0);

    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::InterlockChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (StateId::Idle, StateId::CollectorRunning),
            (StateId::CollectorRunning, StateId::Idle),
            (StateId::Idle, StateId::ShooterRunning),
            (StateId::ShooterRunning, StateId::Idle),
        ]
    );
    assert_eq!(svc.fault_flags() & SafetyFault::CollectorShooterOverlap.mask(), 0);
}

#[test]
fn collector_reverse_runs_backwards() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.press(ButtonId::CollectorReverse);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.interlock_state(), StateId::CollectorRunning);
    assert_eq!(hw.motor(MotorId::Collector), -1.0);

    hw.release(ButtonId::CollectorReverse);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.motor(MotorId::Collector), 0.0);
}

#[test]
fn no_cycle_drives_collector_with_shooter() {
    let (mut svc, mut hw, mut sink) = default_started();
    let script: [&[ButtonId]; 8] = [
        &[ButtonId::Shooter],
        &[ButtonId::Shooter, ButtonId::CollectorForward],
        &[ButtonId::CollectorForward],
        &[],
        &[ButtonId::CollectorForward],
        &[ButtonId::Shooter],
        &[ButtonId::IndexSwitch, ButtonId::CollectorReverse],
        &[ButtonId::CollectorReverse, ButtonId::Shooter],
    ];
    for pressed in script {
        hw.pressed = pressed.iter().copied().collect();
        let out = svc.tick(&mut hw, &mut sink);
        assert!(
            out.motors.collector == 0.0 || (out.motors.shooter == 0.0 && out.motors.indexer == 0.0),
            "overlap with {pressed:?}: {:?}",
            out.motors
        );
    }
}

// ── Gear ──────────────────────────────────────────────────────

#[test]
fn manual_shift_follows_button_hold() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.clear_calls();

    hw.press(ButtonId::Shift);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.gear(), GearState::High);

    svc.tick(&mut hw, &mut sink);
    hw.release(ButtonId::Shift);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.gear(), GearState::Low);

    assert_eq!(
        hw.solenoid_commands(SolenoidId::Shifter),
        vec![Position::Forward, Position::Reverse]
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::GearShifted(_))),
        2
    );
}

#[test]
fn automatic_shift_uses_hysteresis_band() {
    let config = RobotConfig {
        gear_shift_mode: GearShiftMode::Automatic,
        ..Default::default()
    };
    let (mut svc, mut hw, mut sink) = started(&config);

    hw.set_axis(AxisId::DriveY, -0.3);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.gear(), GearState::High);

    // Inside the band: stays high.
    hw.set_axis(AxisId::DriveY, -0.22);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.gear(), GearState::High);

    hw.set_axis(AxisId::DriveY, 0.0);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.gear(), GearState::Low);

    // The shift button has no effect in automatic mode.
    hw.press(ButtonId::Shift);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.gear(), GearState::Low);
}

#[test]
fn full_reverse_in_low_gear_saturates_both_sides() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.set_axis(AxisId::DriveY, -1.0);
    let out = svc.tick(&mut hw, &mut sink);
    assert_eq!(out.drive.left, -1.0);
    assert_eq!(out.drive.right, -1.0);
    assert_eq!(hw.drive(), (-1.0, -1.0));
}

#[test]
fn half_stick_is_shaped_then_scaled_by_gear() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.set_axis(AxisId::DriveY, 0.25);

    // Low: 0.25² · 4 = 0.25
    let out = svc.tick(&mut hw, &mut sink);
    assert!((out.drive.left - 0.25).abs() < 1e-6);

    // High: 0.25² · 1 = 0.0625
    hw.press(ButtonId::Shift);
    let out = svc.tick(&mut hw, &mut sink);
    assert!((out.drive.left - 0.0625).abs() < 1e-6);
}

#[test]
fn expired_watchdog_holds_drive_at_zero_until_cleared() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.set_axis(AxisId::DriveY, -1.0);

    svc.set_watchdog_expired(true, &mut sink);
    let out = svc.tick(&mut hw, &mut sink);
    assert_eq!((out.drive.left, out.drive.right), (0.0, 0.0));
    assert_eq!(hw.drive(), (0.0, 0.0));

    svc.set_watchdog_expired(false, &mut sink);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.drive(), (-1.0, -1.0));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FaultCleared)), 1);
}

// ── Arm and claws ─────────────────────────────────────────────

#[test]
fn arm_stops_at_voltage_limits() {
    let (mut svc, mut hw, mut sink) = default_started();

    hw.set_axis(AxisId::ArmY, -1.0);
    hw.arm_volts = 3.0;
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.motor(MotorId::Arm), 1.0);

    hw.arm_volts = 4.6;
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.motor(MotorId::Arm), 0.0);
    assert_ne!(svc.fault_flags() & SafetyFault::ArmUpperLimit.mask(), 0);

    hw.set_axis(AxisId::ArmY, 1.0);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.motor(MotorId::Arm), -1.0);
    assert_eq!(svc.fault_flags(), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FaultCleared)), 1);

    hw.arm_volts = 0.4;
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.motor(MotorId::Arm), 0.0);
    assert_ne!(svc.fault_flags() & SafetyFault::ArmLowerLimit.mask(), 0);
}

#[test]
fn arm_deadband_holds() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.set_axis(AxisId::ArmY, 0.09);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.motor(MotorId::Arm), 0.0);
    assert_eq!(svc.fault_flags(), 0);
}

#[test]
fn claw_lock_and_unlock_on_press() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.clear_calls();

    hw.press(ButtonId::Claw1Lock);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.claw(ClawId::Claw1), ClawState::Locked);
    assert_eq!(svc.claw(ClawId::Claw2), ClawState::Unlocked);

    // Holding the button does nothing more.
    svc.tick(&mut hw, &mut sink);
    hw.release(ButtonId::Claw1Lock);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.claw(ClawId::Claw1), ClawState::Locked);

    hw.press(ButtonId::Claw1Unlock);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.claw(ClawId::Claw1), ClawState::Unlocked);

    assert_eq!(
        hw.solenoid_commands(SolenoidId::GreenClaw),
        vec![Position::Forward, Position::Reverse]
    );
    assert!(hw.solenoid_commands(SolenoidId::YellowClaw).is_empty());
}

#[test]
fn one_claw_command_per_cycle_in_priority_order() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.clear_calls();

    hw.press(ButtonId::Claw1Unlock);
    hw.press(ButtonId::Claw2Lock);
    svc.tick(&mut hw, &mut sink);

    // Claw 1 unlock wins; claw 2's edge is consumed without effect.
    assert_eq!(
        hw.solenoid_commands(SolenoidId::GreenClaw),
        vec![Position::Reverse]
    );
    assert!(hw.solenoid_commands(SolenoidId::YellowClaw).is_empty());
    assert_eq!(svc.claw(ClawId::Claw2), ClawState::Unlocked);
    // Claw 1 was already unlocked: no change event.
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ClawChanged { .. })), 0);

    svc.tick(&mut hw, &mut sink);
    assert_eq!(svc.claw(ClawId::Claw2), ClawState::Unlocked);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_follows_configured_divisor() {
    let config = RobotConfig {
        telemetry_every_cycles: 4,
        ..Default::default()
    };
    let (mut svc, mut hw, mut sink) = started(&config);
    for _ in 0..10 {
        svc.tick(&mut hw, &mut sink);
    }
    let cycles: Vec<u64> = sink.telemetry().iter().map(|t| t.cycle).collect();
    assert_eq!(cycles, vec![4, 8]);
}

#[test]
fn telemetry_reflects_last_cycle() {
    let (mut svc, mut hw, mut sink) = default_started();
    hw.press(ButtonId::CollectorForward);
    hw.press(ButtonId::Claw2Lock);
    hw.arm_volts = 1.25;
    svc.tick(&mut hw, &mut sink);

    let t = svc.build_telemetry();
    assert_eq!(t.cycle, 1);
    assert_eq!(t.interlock, StateId::CollectorRunning);
    assert_eq!(t.collector, 1.0);
    assert_eq!(t.claw2, ClawState::Locked);
    assert_eq!(t.arm_voltage, 1.25);
    assert_eq!(sink.telemetry().last().copied(), Some(&t));
}
