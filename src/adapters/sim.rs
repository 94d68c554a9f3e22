//! Simulated robot.
//!
//! Host-side stand-ins for every device the [`HardwareAdapter`] drives,
//! plus a scripted driver station.  Each simulated device is a cheap
//! clonable handle around shared state, so the driver station (which
//! plays the operator) and the test harness (which reads the outputs)
//! see the same devices the adapter owns.
//!
//! ## Scenario files
//!
//! JSON lines, one [`ScenarioFrame`] per line.  Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! {"pressed": ["CollectorForward"], "cycles": 50}
//! {"drive_y": -0.6, "cycles": 200}
//! {"pressed": ["Shooter"], "cycles": 5}
//! {"index_switch": true, "cycles": 2}
//! ```

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::ports::ModePort;
use crate::config::{ButtonMap, Device};
use crate::drivers::joystick::Joystick;
use crate::drivers::motor::SpeedController;
use crate::error::ScenarioError;
use crate::pins;
use crate::sensors::ButtonId;
use crate::sensors::potentiometer::{AnalogInput, volts_to_counts};

use super::hardware::{HardwareAdapter, RobotHardware};

// ───────────────────────────────────────────────────────────────
// Devices
// ───────────────────────────────────────────────────────────────

const MAX_AXES: usize = 6;
const MAX_BUTTONS: u8 = 16;

#[derive(Debug, Default)]
struct StickState {
    axes: [f32; MAX_AXES],
    /// Bit `n - 1` = button `n`.
    buttons: u16,
}

#[derive(Debug, Clone, Default)]
pub struct SimJoystick(Rc<RefCell<StickState>>);

impl SimJoystick {
    pub fn set_axis(&self, axis: u8, value: f32) {
        if let Some(slot) = self.0.borrow_mut().axes.get_mut(usize::from(axis)) {
            *slot = value;
        }
    }

    pub fn set_button(&self, button: u8, pressed: bool) {
        if !(1..=MAX_BUTTONS).contains(&button) {
            return;
        }
        let bit = 1u16 << (button - 1);
        let mut s = self.0.borrow_mut();
        if pressed {
            s.buttons |= bit;
        } else {
            s.buttons &= !bit;
        }
    }

    pub fn release_all(&self) {
        let mut s = self.0.borrow_mut();
        s.buttons = 0;
        s.axes = [0.0; MAX_AXES];
    }
}

impl Joystick for SimJoystick {
    fn raw_axis(&mut self, axis: u8) -> f32 {
        self.0
            .borrow()
            .axes
            .get(usize::from(axis))
            .copied()
            .unwrap_or(0.0)
    }

    fn raw_button(&mut self, button: u8) -> bool {
        (1..=MAX_BUTTONS).contains(&button) && self.0.borrow().buttons & (1 << (button - 1)) != 0
    }
}

/// Motor controller that remembers the last output written.
#[derive(Debug, Clone, Default)]
pub struct SimMotor(Rc<Cell<f32>>);

impl SimMotor {
    pub fn output(&self) -> f32 {
        self.0.get()
    }
}

impl SpeedController for SimMotor {
    fn set_output(&mut self, value: f32) {
        self.0.set(value);
    }
}

/// A digital line usable as input or output.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<Cell<bool>>);

impl SimPin {
    pub fn high() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn level(&self) -> bool {
        self.0.get()
    }

    pub fn set_level(&self, high: bool) {
        self.0.set(high);
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimAnalog(Rc<Cell<u16>>);

impl SimAnalog {
    pub fn set_volts(&self, volts: f32) {
        self.0.set(volts_to_counts(volts));
    }
}

impl AnalogInput for SimAnalog {
    fn read_raw(&mut self) -> u16 {
        self.0.get()
    }
}

// ───────────────────────────────────────────────────────────────
// Device bundle
// ───────────────────────────────────────────────────────────────

pub type SimHardware = HardwareAdapter<SimJoystick, SimMotor, SimPin, SimPin, SimAnalog>;

/// Every simulated device, by role.  Clone to share handles.
#[derive(Debug, Clone)]
pub struct SimDevices {
    pub drive_stick: SimJoystick,
    pub shift_stick: SimJoystick,
    pub gamepad: SimJoystick,

    pub left_drive: SimMotor,
    pub right_drive: SimMotor,
    pub collector: SimMotor,
    pub indexer: SimMotor,
    pub shooter: SimMotor,
    pub arm: SimMotor,

    pub shifter: (SimPin, SimPin),
    pub green_claw: (SimPin, SimPin),
    pub yellow_claw: (SimPin, SimPin),

    pub compressor_relay: SimPin,
    pub pressure_switch: SimPin,
    /// Active-low: high = open.
    pub index_switch: SimPin,
    pub arm_pot: SimAnalog,
}

impl Default for SimDevices {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDevices {
    pub fn new() -> Self {
        let devices = Self {
            drive_stick: SimJoystick::default(),
            shift_stick: SimJoystick::default(),
            gamepad: SimJoystick::default(),
            left_drive: SimMotor::default(),
            right_drive: SimMotor::default(),
            collector: SimMotor::default(),
            indexer: SimMotor::default(),
            shooter: SimMotor::default(),
            arm: SimMotor::default(),
            shifter: Default::default(),
            green_claw: Default::default(),
            yellow_claw: Default::default(),
            compressor_relay: SimPin::default(),
            pressure_switch: SimPin::default(),
            index_switch: SimPin::high(),
            arm_pot: SimAnalog::default(),
        };
        devices.arm_pot.set_volts(2.5);
        devices
    }

    /// Build the hardware adapter over shared handles to these devices.
    pub fn hardware(&self, buttons: ButtonMap) -> SimHardware {
        HardwareAdapter::new(
            RobotHardware {
                drive_stick: self.drive_stick.clone(),
                shift_stick: self.shift_stick.clone(),
                gamepad: self.gamepad.clone(),
                left_drive: self.left_drive.clone(),
                right_drive: self.right_drive.clone(),
                collector: self.collector.clone(),
                indexer: self.indexer.clone(),
                shooter: self.shooter.clone(),
                arm: self.arm.clone(),
                shifter: self.shifter.clone(),
                green_claw: self.green_claw.clone(),
                yellow_claw: self.yellow_claw.clone(),
                compressor_relay: self.compressor_relay.clone(),
                pressure_switch: self.pressure_switch.clone(),
                index_switch: self.index_switch.clone(),
                arm_pot: self.arm_pot.clone(),
            },
            buttons,
        )
    }

    /// Press or release the physical button bound to `id`.
    pub fn set_role(&self, buttons: &ButtonMap, id: ButtonId, pressed: bool) {
        let Some(binding) = buttons.binding(id) else {
            return;
        };
        match binding.device {
            Device::DriveStick => self.drive_stick.set_button(binding.button, pressed),
            Device::ShiftStick => self.shift_stick.set_button(binding.button, pressed),
            Device::Gamepad => self.gamepad.set_button(binding.button, pressed),
            Device::Digital if binding.button == pins::INDEXER_SW => {
                self.index_switch.set_level(!pressed)
            }
            Device::Digital => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Scenario
// ───────────────────────────────────────────────────────────────

/// Operator inputs held for `cycles` control cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFrame {
    pub drive_y: f32,
    pub drive_x: f32,
    pub arm_y: f32,
    pub arm_volts: f32,
    /// Roles held down during the frame; everything else is released.
    pub pressed: Vec<ButtonId>,
    pub index_switch: bool,
    pub tank_full: bool,
    pub cycles: u32,
}

impl Default for ScenarioFrame {
    fn default() -> Self {
        Self {
            drive_y: 0.0,
            drive_x: 0.0,
            arm_y: 0.0,
            arm_volts: 2.5,
            pressed: Vec::new(),
            index_switch: false,
            tank_full: false,
            cycles: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    frames: Vec<ScenarioFrame>,
}

impl Scenario {
    pub fn new(frames: Vec<ScenarioFrame>) -> Self {
        Self { frames }
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, ScenarioError> {
        let mut frames = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let frame = serde_json::from_str(trimmed).map_err(|source| ScenarioError::Parse {
                line: idx + 1,
                source,
            })?;
            frames.push(frame);
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[ScenarioFrame] {
        &self.frames
    }

    /// Total cycles the scenario spans.
    pub fn total_cycles(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.cycles.max(1))).sum()
    }
}

// ───────────────────────────────────────────────────────────────
// Driver station
// ───────────────────────────────────────────────────────────────

/// Scripted driver station.
///
/// Each [`is_operator_control`](ModePort::is_operator_control) poll
/// applies the next cycle's operator inputs to the simulated devices.
/// Operator control ends when the scenario is exhausted, the cycle
/// limit is reached, or the stop flag (Ctrl-C) is raised.  Without a
/// scenario the inputs stay neutral until one of the other two ends it.
pub struct SimDriverStation {
    devices: SimDevices,
    buttons: ButtonMap,
    scenario: Option<Scenario>,
    frame: usize,
    frame_cycles_left: u32,
    max_cycles: Option<u64>,
    polls: u64,
    stop: Arc<AtomicBool>,
}

impl SimDriverStation {
    pub fn new(devices: SimDevices, buttons: ButtonMap, stop: Arc<AtomicBool>) -> Self {
        Self {
            devices,
            buttons,
            scenario: None,
            frame: 0,
            frame_cycles_left: 0,
            max_cycles: None,
            polls: 0,
            stop,
        }
    }

    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    #[must_use]
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Cycles granted so far.
    pub fn cycles(&self) -> u64 {
        self.polls
    }

    fn apply(&self, frame: &ScenarioFrame) {
        let d = &self.devices;
        d.drive_stick.set_axis(pins::STICK_Y_AXIS, frame.drive_y);
        d.drive_stick.set_axis(pins::STICK_X_AXIS, frame.drive_x);
        d.gamepad.set_axis(pins::GAMEPAD_LEFT_Y_AXIS, frame.arm_y);
        d.arm_pot.set_volts(frame.arm_volts);
        d.pressure_switch.set_level(frame.tank_full);

        for id in ButtonId::ALL {
            if id != ButtonId::IndexSwitch {
                d.set_role(&self.buttons, id, frame.pressed.contains(&id));
            }
        }
        let index_closed = frame.index_switch || frame.pressed.contains(&ButtonId::IndexSwitch);
        d.set_role(&self.buttons, ButtonId::IndexSwitch, index_closed);
    }

    /// Advance the script by one cycle.  `false` once it is exhausted.
    fn advance(&mut self) -> bool {
        let Some(scenario) = &self.scenario else {
            return true;
        };
        if self.frame_cycles_left == 0 {
            let Some(frame) = scenario.frames.get(self.frame) else {
                return false;
            };
            debug!("SIM | frame {} {:?}", self.frame, frame);
            self.apply(frame);
            self.frame_cycles_left = frame.cycles.max(1);
            self.frame += 1;
        }
        self.frame_cycles_left -= 1;
        true
    }
}

impl ModePort for SimDriverStation {
    fn is_operator_control(&mut self) -> bool {
        if self.stop.load(Ordering::SeqCst) {
            info!("SIM | stop requested after {} cycles", self.polls);
            return false;
        }
        if self.max_cycles.is_some_and(|max| self.polls >= max) {
            info!("SIM | cycle limit reached ({})", self.polls);
            return false;
        }
        if !self.advance() {
            info!("SIM | scenario finished after {} cycles", self.polls);
            return false;
        }
        self.polls += 1;
        true
    }
}
