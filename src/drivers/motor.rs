//! PWM motor controller driver.
//!
//! Wraps any [`SpeedController`] (Victor, Jaguar, Talon, or a simulated
//! one) behind one clamped, optionally inverted `set`/`stop` interface.
//! Which controller type sits on each channel is chosen when the
//! hardware adapter is built, not in the control logic.

/// A continuous-output motor controller.
pub trait SpeedController {
    /// Write an output in `[-1.0, 1.0]`.
    fn set_output(&mut self, value: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorState {
    Stopped,
    Running { output: f32 },
}

pub struct Motor<C> {
    controller: C,
    inverted: bool,
    state: MotorState,
}

impl<C: SpeedController> Motor<C> {
    pub fn new(controller: C) -> Self {
        Self::with_inversion(controller, false)
    }

    /// Motor mounted mirrored; positive commands are negated on the wire.
    pub fn inverted(controller: C) -> Self {
        Self::with_inversion(controller, true)
    }

    fn with_inversion(mut controller: C, inverted: bool) -> Self {
        controller.set_output(0.0);
        Self {
            controller,
            inverted,
            state: MotorState::Stopped,
        }
    }

    pub fn set(&mut self, value: f32) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
        if value == 0.0 {
            self.stop();
            return;
        }
        self.controller
            .set_output(if self.inverted { -value } else { value });
        self.state = MotorState::Running { output: value };
    }

    pub fn stop(&mut self) {
        self.controller.set_output(0.0);
        self.state = MotorState::Stopped;
    }

    /// Last commanded output, before inversion.
    pub fn get(&self) -> f32 {
        match self.state {
            MotorState::Stopped => 0.0,
            MotorState::Running { output } => output,
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }
}
