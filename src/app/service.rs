//! Robot service: the hexagonal core.
//!
//! [`RobotService`] owns every state machine for the lifetime of operator
//! control: the input snapshot, the collector/shooter interlock, the gear
//! shifter, the arm and claws, and the safety supervisor.  All I/O flows
//! through port traits injected at call sites, so the whole cycle is
//! testable with mock adapters.
//!
//! ```text
//!   InputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │         RobotService          │
//! ActuatorPort ◀──│ Interlock · Gear · Arm · Safety│
//!                 └──────────────────────────────┘
//! ```
//!
//! ## Cycle order
//!
//! 1. Refresh the input snapshot (every edge detector, once).
//! 2. Collector/shooter interlock.
//! 3. Gear shift, then drive shaping and mixing.
//! 4. Arm motor and claws.
//! 5. Safety gate on the mechanism commands.
//! 6. Write mechanism outputs, regulate the compressor.
//! 7. Telemetry.

use log::info;

use crate::config::RobotConfig;
use crate::control::arm::{ArmCommand, ArmStateMachine, ClawEvents, ClawId, ClawState};
use crate::control::drive::{SideOutputs, arcade_mix, compute_drive};
use crate::control::gear::{GearShiftMode, GearShiftStateMachine, GearState};
use crate::error::SafetyFault;
use crate::fsm::StateId;
use crate::fsm::context::{InterlockEvents, MotorCommands};
use crate::fsm::interlock::CollectorShooterInterlock;
use crate::safety::SafetySupervisor;
use crate::sensors::{ButtonId, InputSnapshot};

use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, AxisId, EventSink, InputPort, MotorId, Position, SolenoidId};

/// Everything one cycle commanded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutputs {
    pub drive: SideOutputs,
    pub motors: MotorCommands,
    pub arm: ArmCommand,
    pub arm_voltage: f32,
}

impl Default for CycleOutputs {
    fn default() -> Self {
        Self {
            drive: SideOutputs::STOPPED,
            motors: MotorCommands::all_off(),
            arm: crate::control::arm::arm_command(0.0, 0.0),
            arm_voltage: 0.0,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// RobotService
// ───────────────────────────────────────────────────────────────

pub struct RobotService {
    snapshot: InputSnapshot,
    interlock: CollectorShooterInterlock,
    gear: GearShiftStateMachine,
    arm: ArmStateMachine,
    safety: SafetySupervisor,
    telemetry_every: u64,
    cycle: u64,
    last: CycleOutputs,
}

impl RobotService {
    /// Build every state machine from configuration.  Tracked inputs are
    /// fixed here for the lifetime of the service.
    pub fn new(config: &RobotConfig) -> Self {
        Self {
            snapshot: InputSnapshot::new(&config.buttons.tracked()),
            interlock: CollectorShooterInterlock::new(),
            gear: GearShiftStateMachine::new(config.gear_shift_mode),
            arm: ArmStateMachine::new(),
            safety: SafetySupervisor::new(),
            telemetry_every: u64::from(config.telemetry_every_cycles.max(1)),
            cycle: 0,
            last: CycleOutputs::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Operator-control start-up.
    ///
    /// Primes every edge detector with its current level so a button
    /// already held produces no event, then commands the shifter and both
    /// claws to `Reverse` (Low / Unlocked) and starts the compressor.
    pub fn start(&mut self, hw: &mut (impl InputPort + ActuatorPort), sink: &mut impl EventSink) {
        self.snapshot.refresh(hw);

        self.interlock.reset();
        self.gear.reset();
        self.arm.reset();

        hw.set_solenoid(SolenoidId::Shifter, Position::Reverse);
        hw.set_solenoid(SolenoidId::GreenClaw, Position::Reverse);
        hw.set_solenoid(SolenoidId::YellowClaw, Position::Reverse);
        hw.start_compressor();

        sink.emit(&AppEvent::Started);
        info!(
            "RobotService started: gear {:?}, {:?} shifting",
            self.gear.gear(),
            self.gear.mode()
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl InputPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> CycleOutputs {
        self.cycle += 1;

        // 1. Inputs
        self.snapshot.refresh(hw);

        // 2. Collector / shooter interlock
        let prev_state = self.interlock.state();
        let mut motors = self
            .interlock
            .update(InterlockEvents::from_snapshot(&self.snapshot));
        let new_state = self.interlock.state();
        if new_state != prev_state {
            sink.emit(&AppEvent::InterlockChanged {
                from: prev_state,
                to: new_state,
            });
        }

        // 3. Gear, then drive
        let drive_y = hw.axis(AxisId::DriveY);
        let drive_x = hw.axis(AxisId::DriveX);
        if let Some(gear) = self
            .gear
            .update(self.snapshot.event(ButtonId::Shift), drive_y)
        {
            hw.set_solenoid(SolenoidId::Shifter, gear.position());
            sink.emit(&AppEvent::GearShifted(gear));
        }
        // Held at zero for any cycle the drive watchdog has flagged.
        let drive = if self.safety.has_fault(SafetyFault::DriveWatchdogExpired) {
            SideOutputs::STOPPED
        } else {
            arcade_mix(compute_drive(drive_y, drive_x, self.gear.gear()))
        };
        hw.set_drive(drive.left, drive.right);

        // 4. Arm and claws
        let arm_axis = hw.axis(AxisId::ArmY);
        let arm_voltage = hw.arm_voltage();
        let claws_before = (self.arm.claw(ClawId::Claw1), self.arm.claw(ClawId::Claw2));
        let arm_out = self.arm.update(
            arm_axis,
            arm_voltage,
            &ClawEvents::from_snapshot(&self.snapshot),
        );
        if let Some(change) = arm_out.claw_change {
            hw.set_solenoid(change.claw.solenoid(), change.state.position());
            let before = match change.claw {
                ClawId::Claw1 => claws_before.0,
                ClawId::Claw2 => claws_before.1,
            };
            if before != change.state {
                sink.emit(&AppEvent::ClawChanged {
                    claw: change.claw,
                    state: change.state,
                });
            }
        }

        // 5. Safety gate
        let prev_faults = self.safety.faults();
        let faults = self.safety.enforce(&mut motors, &arm_out.command);
        self.report_faults(prev_faults, faults, sink);

        // 6. Outputs
        hw.set_motor(MotorId::Collector, motors.collector);
        hw.set_motor(MotorId::Shooter, motors.shooter);
        hw.set_motor(MotorId::Indexer, motors.indexer);
        hw.set_motor(MotorId::Arm, arm_out.command.motor);
        hw.regulate_pressure();

        self.last = CycleOutputs {
            drive,
            motors,
            arm: arm_out.command,
            arm_voltage,
        };

        // 7. Telemetry
        if self.cycle % self.telemetry_every == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }

        self.last
    }

    /// Record the drive watchdog's verdict for this cycle.  While it is
    /// set, [`tick`](Self::tick) commands the drive to zero.
    pub fn set_watchdog_expired(&mut self, expired: bool, sink: &mut impl EventSink) {
        let prev = self.safety.faults();
        self.safety.set_watchdog_expired(expired);
        self.report_faults(prev, self.safety.faults(), sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            cycle: self.cycle,
            interlock: self.interlock.state(),
            gear: self.gear.gear(),
            drive_left: self.last.drive.left,
            drive_right: self.last.drive.right,
            collector: self.last.motors.collector,
            shooter: self.last.motors.shooter,
            indexer: self.last.motors.indexer,
            arm_motor: self.last.arm.motor,
            arm_voltage: self.last.arm_voltage,
            claw1: self.arm.claw(ClawId::Claw1),
            claw2: self.arm.claw(ClawId::Claw2),
            fault_flags: self.safety.faults(),
        }
    }

    pub fn interlock_state(&self) -> StateId {
        self.interlock.state()
    }

    pub fn gear(&self) -> GearState {
        self.gear.gear()
    }

    pub fn gear_mode(&self) -> GearShiftMode {
        self.gear.mode()
    }

    pub fn claw(&self, claw: ClawId) -> ClawState {
        self.arm.claw(claw)
    }

    pub fn fault_flags(&self) -> u8 {
        self.safety.faults()
    }

    /// Control cycles executed since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle
    }

    pub fn last_outputs(&self) -> CycleOutputs {
        self.last
    }

    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    // ── Internal ──────────────────────────────────────────────

    fn report_faults(&self, prev: u8, now: u8, sink: &mut impl EventSink) {
        if now & !prev != 0 {
            sink.emit(&AppEvent::FaultDetected(now));
        } else if prev != 0 && now == 0 {
            sink.emit(&AppEvent::FaultCleared);
        }
    }
}
