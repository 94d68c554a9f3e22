//! Robot configuration.
//!
//! Loaded from a TOML file by [`ConfigFileAdapter`](crate::adapters::config_file::ConfigFileAdapter);
//! every field has a default so a partial file is valid.  The control
//! thresholds (gear hysteresis, arm voltage limits, drive gains,
//! shooter speed) are constants in their own modules, not fields here.

use serde::{Deserialize, Serialize};

use crate::control::gear::GearShiftMode;
use crate::error::ConfigError;
use crate::pins;
use crate::sensors::{ButtonId, TrackedInputs};

// ---------------------------------------------------------------------------
// Button bindings
// ---------------------------------------------------------------------------

/// Physical source of a button or switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    DriveStick,
    ShiftStick,
    Gamepad,
    /// A digital input channel on the control system.
    Digital,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub device: Device,
    /// Button number (one-based) or digital channel.
    pub button: u8,
}

impl ButtonBinding {
    pub const fn new(device: Device, button: u8) -> Self {
        Self { device, button }
    }
}

/// Maps each logical role to its physical button.  A role left out of
/// the file is not tracked and never produces events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_forward: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_reverse: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shooter: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claw1_lock: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claw1_unlock: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claw2_lock: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claw2_unlock: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_switch: Option<ButtonBinding>,
}

impl Default for ButtonMap {
    fn default() -> Self {
        use Device::*;
        Self {
            collector_forward: Some(ButtonBinding::new(Gamepad, pins::BUTTON_COLLECTOR_FWD)),
            collector_reverse: Some(ButtonBinding::new(Gamepad, pins::BUTTON_COLLECTOR_REV)),
            shooter: Some(ButtonBinding::new(Gamepad, pins::BUTTON_SHOOTER)),
            claw1_lock: Some(ButtonBinding::new(Gamepad, pins::BUTTON_CLAW_1_LOCKED)),
            claw1_unlock: Some(ButtonBinding::new(Gamepad, pins::BUTTON_CLAW_1_UNLOCKED)),
            claw2_lock: Some(ButtonBinding::new(Gamepad, pins::BUTTON_CLAW_2_LOCKED)),
            claw2_unlock: Some(ButtonBinding::new(Gamepad, pins::BUTTON_CLAW_2_UNLOCKED)),
            shift: Some(ButtonBinding::new(ShiftStick, pins::BUTTON_SHIFT)),
            index_switch: Some(ButtonBinding::new(Digital, pins::INDEXER_SW)),
        }
    }
}

impl ButtonMap {
    /// A map with nothing bound.
    pub fn empty() -> Self {
        Self {
            collector_forward: None,
            collector_reverse: None,
            shooter: None,
            claw1_lock: None,
            claw1_unlock: None,
            claw2_lock: None,
            claw2_unlock: None,
            shift: None,
            index_switch: None,
        }
    }

    pub fn binding(&self, id: ButtonId) -> Option<ButtonBinding> {
        *self.slot(id)
    }

    pub fn bind(&mut self, id: ButtonId, binding: Option<ButtonBinding>) {
        *self.slot_mut(id) = binding;
    }

    /// Every bound role, in [`ButtonId::ALL`] order.
    pub fn bindings(&self) -> impl Iterator<Item = (ButtonId, ButtonBinding)> + '_ {
        ButtonId::ALL
            .into_iter()
            .filter_map(|id| self.binding(id).map(|b| (id, b)))
    }

    /// The explicit enablement list handed to the input snapshot.
    pub fn tracked(&self) -> TrackedInputs {
        let mut tracked = TrackedInputs::new();
        for (id, _) in self.bindings() {
            tracked.enable(id);
        }
        tracked
    }

    fn slot(&self, id: ButtonId) -> &Option<ButtonBinding> {
        match id {
            ButtonId::CollectorForward => &self.collector_forward,
            ButtonId::CollectorReverse => &self.collector_reverse,
            ButtonId::Shooter => &self.shooter,
            ButtonId::Claw1Lock => &self.claw1_lock,
            ButtonId::Claw1Unlock => &self.claw1_unlock,
            ButtonId::Claw2Lock => &self.claw2_lock,
            ButtonId::Claw2Unlock => &self.claw2_unlock,
            ButtonId::Shift => &self.shift,
            ButtonId::IndexSwitch => &self.index_switch,
        }
    }

    fn slot_mut(&mut self, id: ButtonId) -> &mut Option<ButtonBinding> {
        match id {
            ButtonId::CollectorForward => &mut self.collector_forward,
            ButtonId::CollectorReverse => &mut self.collector_reverse,
            ButtonId::Shooter => &mut self.shooter,
            ButtonId::Claw1Lock => &mut self.claw1_lock,
            ButtonId::Claw1Unlock => &mut self.claw1_unlock,
            ButtonId::Claw2Lock => &mut self.claw2_lock,
            ButtonId::Claw2Unlock => &mut self.claw2_unlock,
            ButtonId::Shift => &mut self.shift,
            ButtonId::IndexSwitch => &mut self.index_switch,
        }
    }
}

// ---------------------------------------------------------------------------
// RobotConfig
// ---------------------------------------------------------------------------

/// Core robot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Shown in the start-up banner.
    pub robot_name: String,

    // --- Loop ---
    /// Sleep between control cycles (milliseconds)
    pub loop_interval_ms: u32,
    /// Emit telemetry every N cycles
    pub telemetry_every_cycles: u32,

    // --- Drive ---
    pub gear_shift_mode: GearShiftMode,
    /// Drive motors stop if not refreshed within this window (milliseconds)
    pub drive_expiration_ms: u32,

    // --- Autonomous ---
    /// Open-loop drive output, negative = forward
    pub autonomous_speed: f32,
    pub autonomous_duration_ms: u32,

    pub buttons: ButtonMap,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            robot_name: "Wham-O".into(),

            loop_interval_ms: 5,
            telemetry_every_cycles: 1,

            gear_shift_mode: GearShiftMode::Manual,
            drive_expiration_ms: 100,

            autonomous_speed: -0.5, // half speed forward
            autonomous_duration_ms: 2000,

            buttons: ButtonMap::default(),
        }
    }
}

impl RobotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("loop_interval_ms must be > 0"));
        }
        if self.telemetry_every_cycles == 0 {
            return Err(ConfigError::ValidationFailed(
                "telemetry_every_cycles must be > 0",
            ));
        }
        if self.drive_expiration_ms == 0 {
            return Err(ConfigError::ValidationFailed("drive_expiration_ms must be > 0"));
        }
        if !(-1.0..=1.0).contains(&self.autonomous_speed) {
            return Err(ConfigError::ValidationFailed(
                "autonomous_speed must be within [-1, 1]",
            ));
        }

        let bound: Vec<ButtonBinding> = self.buttons.bindings().map(|(_, b)| b).collect();
        for (i, a) in bound.iter().enumerate() {
            if bound[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed(
                    "two roles are bound to the same button",
                ));
            }
        }
        Ok(())
    }
}
