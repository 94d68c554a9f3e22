//! Outbound application events.
//!
//! The [`RobotService`](super::service::RobotService) and the
//! [`ControlLoop`](super::control_loop::ControlLoop) emit these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log to the console, feed a
//! dashboard, record for a test.

use crate::control::arm::{ClawId, ClawState};
use crate::control::gear::GearState;
use crate::diagnostics::LoopStats;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Autonomous timed drive began.
    AutonomousStarted { speed: f32, duration_ms: u32 },

    /// Autonomous finished; drive stopped.
    AutonomousFinished,

    /// Operator control started: detectors primed, shifter low, claws
    /// unlocked, compressor running.
    Started,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The collector/shooter interlock changed state.
    InterlockChanged { from: StateId, to: StateId },

    GearShifted(GearState),

    ClawChanged { claw: ClawId, state: ClawState },

    /// One or more new safety faults were raised (carries the full mask).
    FaultDetected(u8),

    /// All safety faults have been cleared.
    FaultCleared,

    /// Drive outputs went stale and were stopped.
    WatchdogExpired,

    /// Operator control ended.
    Stopped(LoopStats),
}

/// A point-in-time telemetry snapshot suitable for logging or display.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub cycle: u64,
    pub interlock: StateId,
    pub gear: GearState,
    pub drive_left: f32,
    pub drive_right: f32,
    pub collector: f32,
    pub shooter: f32,
    pub indexer: f32,
    pub arm_motor: f32,
    /// Arm rotation potentiometer, volts.
    pub arm_voltage: f32,
    pub claw1: ClawState,
    pub claw2: ClawState,
    pub fault_flags: u8,
}
