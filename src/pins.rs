//! Channel assignments for the robot's control system wiring.
//!
//! Single source of truth: the hardware adapter and the default button
//! map reference this module rather than hard-coding channel numbers.

// ---------------------------------------------------------------------------
// Driver station USB ports
// ---------------------------------------------------------------------------

/// Arcade drive joystick.
pub const DRIVE_STICK_PORT: u8 = 1;
/// Second joystick; carries the gear-shift button.
pub const SHIFT_STICK_PORT: u8 = 2;
/// Mechanism gamepad (collector, shooter, arm, claws).
pub const GAMEPAD_PORT: u8 = 3;

// ---------------------------------------------------------------------------
// Joystick axes (zero-based)
// ---------------------------------------------------------------------------

pub const STICK_X_AXIS: u8 = 0;
pub const STICK_Y_AXIS: u8 = 1;
pub const GAMEPAD_LEFT_Y_AXIS: u8 = 1;

// ---------------------------------------------------------------------------
// Buttons (one-based, as printed on the controller)
// ---------------------------------------------------------------------------

pub const BUTTON_SHIFT: u8 = 1;
pub const BUTTON_COLLECTOR_FWD: u8 = 6;
pub const BUTTON_COLLECTOR_REV: u8 = 8;
pub const BUTTON_SHOOTER: u8 = 5;
pub const BUTTON_CLAW_1_LOCKED: u8 = 1;
pub const BUTTON_CLAW_1_UNLOCKED: u8 = 2;
pub const BUTTON_CLAW_2_LOCKED: u8 = 3;
pub const BUTTON_CLAW_2_UNLOCKED: u8 = 4;

// ---------------------------------------------------------------------------
// PWM outputs
// ---------------------------------------------------------------------------

pub const LEFT_DRIVE_PWM: u8 = 1;
pub const RIGHT_DRIVE_PWM: u8 = 2;
pub const PICKUP_PWM: u8 = 3;
pub const INDEX_PWM: u8 = 4;
pub const SHOOTER_PWM: u8 = 5;
pub const ARM_PWM: u8 = 6;

// ---------------------------------------------------------------------------
// Solenoid module channels (forward, reverse)
// ---------------------------------------------------------------------------

pub const SHIFTER_A: u8 = 1;
pub const SHIFTER_B: u8 = 2;
pub const CLAW_1_LOCKED: u8 = 3;
pub const CLAW_1_UNLOCKED: u8 = 4;
pub const CLAW_2_LOCKED: u8 = 5;
pub const CLAW_2_UNLOCKED: u8 = 6;

// ---------------------------------------------------------------------------
// Analog / digital inputs
// ---------------------------------------------------------------------------

/// Arm rotation potentiometer.
pub const ARM_ROTATION_POT: u8 = 1;
/// Disk index switch in the indexer.
pub const INDEXER_SW: u8 = 2;
/// Compressor pressure switch (true = tank full).
pub const COMPRESSOR_PRESSURE_SW: u8 = 1;
/// Relay channel for the compressor spike.
pub const COMPRESSOR_SPIKE: u8 = 1;
