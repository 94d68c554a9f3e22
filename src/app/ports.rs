//! Port traits: the hexagonal boundary between the control logic and the robot.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RobotService (domain)
//! ```
//!
//! Driven adapters (joysticks, sensors, motor controllers, solenoids,
//! event sinks, config storage) implement these traits.  The
//! [`RobotService`](super::service::RobotService) consumes them via
//! generics, so the control logic never touches hardware directly.
//!
//! Port methods on the cycle path are infallible: inputs are assumed to
//! always be available, and adapters log and swallow device errors.

use serde::{Deserialize, Serialize};

use crate::config::RobotConfig;
use crate::error::ConfigError;
use crate::sensors::ButtonId;

// ───────────────────────────────────────────────────────────────
// Identifiers
// ───────────────────────────────────────────────────────────────

/// Analog axes read by the control logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisId {
    /// Drive stick Y (negative = pushed forward).
    DriveY,
    /// Drive stick X (turn).
    DriveX,
    /// Gamepad left stick Y (negative = raise arm).
    ArmY,
}

/// Continuous motor outputs other than the drivetrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorId {
    Collector,
    Indexer,
    Shooter,
    Arm,
}

/// Double-acting pneumatic outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolenoidId {
    Shifter,
    /// Claw 1.
    GreenClaw,
    /// Claw 2.
    YellowClaw,
}

/// Position of a two-position actuator.  No intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Forward,
    Reverse,
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample the operator and sensors.
pub trait InputPort {
    /// Analog axis in `[-1.0, 1.0]`.
    fn axis(&mut self, axis: AxisId) -> f32;

    /// Raw level of a button or switch (`true` = closed / pressed).
    fn button(&mut self, id: ButtonId) -> bool;

    /// Arm rotation sensor voltage.
    fn arm_voltage(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Left/right drivetrain outputs, each in `[-1.0, 1.0]`.
    fn set_drive(&mut self, left: f32, right: f32);

    /// Set a continuous motor output in `[-1.0, 1.0]`.
    fn set_motor(&mut self, motor: MotorId, value: f32);

    /// Command a two-position actuator.
    fn set_solenoid(&mut self, solenoid: SolenoidId, position: Position);

    /// Last commanded position of a two-position actuator.
    fn solenoid(&self, solenoid: SolenoidId) -> Position;

    /// Enable the compressor's automatic regulation.
    fn start_compressor(&mut self);

    /// Run one pressure-regulation step.  Called once per cycle.
    fn regulate_pressure(&mut self);

    /// Stop every motor (drive + mechanisms) and the compressor.
    /// Solenoids hold position.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Mode port (driver station → domain)
// ───────────────────────────────────────────────────────────────

/// Match-mode signal from the driver station.
///
/// Polled once per loop iteration; the operator-control loop exits the
/// first time it returns `false`.
pub trait ModePort {
    fn is_operator_control(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (console log,
/// dashboard, recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists robot configuration.
///
/// Implementations MUST run [`RobotConfig::validate`] before returning a
/// loaded config and before persisting one.
pub trait ConfigPort {
    /// Returns [`ConfigError::NotFound`] if no stored config exists.
    fn load(&self) -> Result<RobotConfig, ConfigError>;

    fn save(&self, config: &RobotConfig) -> Result<(), ConfigError>;
}
