//! Hardware adapter: bridges robot peripherals to the domain ports.
//!
//! Owns every device driver and exposes them through [`InputPort`] and
//! [`ActuatorPort`].  The concrete device types are generic parameters,
//! chosen when the robot is assembled:
//!
//! | Param | Role                       | Trait                          |
//! |-------|----------------------------|--------------------------------|
//! | `J`   | joysticks / gamepad        | [`Joystick`]                   |
//! | `M`   | PWM motor controllers      | [`SpeedController`]            |
//! | `P`   | solenoid coils, relay      | `embedded_hal` `OutputPin`     |
//! | `I`   | index + pressure switches  | `embedded_hal` `InputPin`      |
//! | `A`   | arm potentiometer channel  | [`AnalogInput`]                |
//!
//! Button roles are resolved through the configured [`ButtonMap`].

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, AxisId, InputPort, MotorId, Position, SolenoidId};
use crate::config::{ButtonMap, Device};
use crate::drivers::compressor::Compressor;
use crate::drivers::joystick::{self, Joystick};
use crate::drivers::motor::{Motor, SpeedController};
use crate::drivers::solenoid::DoubleSolenoid;
use crate::pins;
use crate::sensors::ButtonId;
use crate::sensors::limit_switch::LimitSwitch;
use crate::sensors::potentiometer::{AnalogInput, Potentiometer};

/// Raw devices handed to [`HardwareAdapter::new`].
pub struct RobotHardware<J, M, P, I, A> {
    pub drive_stick: J,
    pub shift_stick: J,
    pub gamepad: J,

    pub left_drive: M,
    /// Mounted mirrored; inverted by the adapter.
    pub right_drive: M,
    pub collector: M,
    pub indexer: M,
    pub shooter: M,
    pub arm: M,

    /// (forward, reverse) coil pairs.
    pub shifter: (P, P),
    pub green_claw: (P, P),
    pub yellow_claw: (P, P),

    pub compressor_relay: P,
    /// High = tank full.
    pub pressure_switch: I,
    /// Active-low disk index switch.
    pub index_switch: I,
    pub arm_pot: A,
}

pub struct HardwareAdapter<J, M, P, I, A> {
    drive_stick: J,
    shift_stick: J,
    gamepad: J,
    buttons: ButtonMap,

    left_drive: Motor<M>,
    right_drive: Motor<M>,
    collector: Motor<M>,
    indexer: Motor<M>,
    shooter: Motor<M>,
    arm: Motor<M>,

    shifter: DoubleSolenoid<P>,
    green_claw: DoubleSolenoid<P>,
    yellow_claw: DoubleSolenoid<P>,

    compressor: Compressor<I, P>,
    index_switch: LimitSwitch<I>,
    arm_pot: Potentiometer<A>,
}

impl<J, M, P, I, A> HardwareAdapter<J, M, P, I, A>
where
    J: Joystick,
    M: SpeedController,
    P: OutputPin,
    I: InputPin,
    A: AnalogInput,
{
    /// Take ownership of the devices.  Motors start stopped, the shifter
    /// and claws start in `Reverse`.
    pub fn new(hw: RobotHardware<J, M, P, I, A>, buttons: ButtonMap) -> Self {
        let (sa, sb) = hw.shifter;
        let (g1, g2) = hw.green_claw;
        let (y1, y2) = hw.yellow_claw;
        Self {
            drive_stick: hw.drive_stick,
            shift_stick: hw.shift_stick,
            gamepad: hw.gamepad,
            buttons,

            left_drive: Motor::new(hw.left_drive),
            right_drive: Motor::inverted(hw.right_drive),
            collector: Motor::new(hw.collector),
            indexer: Motor::new(hw.indexer),
            shooter: Motor::new(hw.shooter),
            arm: Motor::new(hw.arm),

            shifter: DoubleSolenoid::new(sa, sb, "shifter", Position::Reverse),
            green_claw: DoubleSolenoid::new(g1, g2, "green claw", Position::Reverse),
            yellow_claw: DoubleSolenoid::new(y1, y2, "yellow claw", Position::Reverse),

            compressor: Compressor::new(hw.pressure_switch, hw.compressor_relay),
            index_switch: LimitSwitch::active_low(hw.index_switch, "index switch"),
            arm_pot: Potentiometer::new(hw.arm_pot),
        }
    }

    pub fn buttons(&self) -> &ButtonMap {
        &self.buttons
    }

    pub fn compressor_running(&self) -> bool {
        self.compressor.is_running()
    }

    fn motor_mut(&mut self, motor: MotorId) -> &mut Motor<M> {
        match motor {
            MotorId::Collector => &mut self.collector,
            MotorId::Indexer => &mut self.indexer,
            MotorId::Shooter => &mut self.shooter,
            MotorId::Arm => &mut self.arm,
        }
    }

    pub fn motor_output(&self, motor: MotorId) -> f32 {
        match motor {
            MotorId::Collector => self.collector.get(),
            MotorId::Indexer => self.indexer.get(),
            MotorId::Shooter => self.shooter.get(),
            MotorId::Arm => self.arm.get(),
        }
    }

    fn valve(&self, solenoid: SolenoidId) -> &DoubleSolenoid<P> {
        match solenoid {
            SolenoidId::Shifter => &self.shifter,
            SolenoidId::GreenClaw => &self.green_claw,
            SolenoidId::YellowClaw => &self.yellow_claw,
        }
    }

    fn valve_mut(&mut self, solenoid: SolenoidId) -> &mut DoubleSolenoid<P> {
        match solenoid {
            SolenoidId::Shifter => &mut self.shifter,
            SolenoidId::GreenClaw => &mut self.green_claw,
            SolenoidId::YellowClaw => &mut self.yellow_claw,
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<J, M, P, I, A> InputPort for HardwareAdapter<J, M, P, I, A>
where
    J: Joystick,
    M: SpeedController,
    P: OutputPin,
    I: InputPin,
    A: AnalogInput,
{
    fn axis(&mut self, axis: AxisId) -> f32 {
        match axis {
            AxisId::DriveY => joystick::axis(&mut self.drive_stick, pins::STICK_Y_AXIS),
            AxisId::DriveX => joystick::axis(&mut self.drive_stick, pins::STICK_X_AXIS),
            AxisId::ArmY => joystick::axis(&mut self.gamepad, pins::GAMEPAD_LEFT_Y_AXIS),
        }
    }

    fn button(&mut self, id: ButtonId) -> bool {
        let Some(binding) = self.buttons.binding(id) else {
            return false;
        };
        match binding.device {
            Device::DriveStick => self.drive_stick.raw_button(binding.button),
            Device::ShiftStick => self.shift_stick.raw_button(binding.button),
            Device::Gamepad => self.gamepad.raw_button(binding.button),
            // The index switch is the only wired digital input.
            Device::Digital if binding.button == pins::INDEXER_SW => {
                self.index_switch.is_closed()
            }
            Device::Digital => false,
        }
    }

    fn arm_voltage(&mut self) -> f32 {
        self.arm_pot.voltage()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<J, M, P, I, A> ActuatorPort for HardwareAdapter<J, M, P, I, A>
where
    J: Joystick,
    M: SpeedController,
    P: OutputPin,
    I: InputPin,
    A: AnalogInput,
{
    fn set_drive(&mut self, left: f32, right: f32) {
        self.left_drive.set(left);
        self.right_drive.set(right);
    }

    fn set_motor(&mut self, motor: MotorId, value: f32) {
        self.motor_mut(motor).set(value);
    }

    fn set_solenoid(&mut self, solenoid: SolenoidId, position: Position) {
        self.valve_mut(solenoid).set(position);
    }

    fn solenoid(&self, solenoid: SolenoidId) -> Position {
        self.valve(solenoid).get()
    }

    fn start_compressor(&mut self) {
        self.compressor.start();
    }

    fn regulate_pressure(&mut self) {
        self.compressor.regulate();
    }

    fn all_off(&mut self) {
        self.left_drive.stop();
        self.right_drive.stop();
        self.collector.stop();
        self.indexer.stop();
        self.shooter.stop();
        self.arm.stop();
        self.compressor.stop();
    }
}
