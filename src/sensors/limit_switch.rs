//! Digital limit switch (disk index switch).
//!
//! Wired to a digital input with a pull-up.  The switch shorts the line
//! to ground when a disk reaches the index position, so the default
//! wiring is active-low.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::error::DeviceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    High,
    Low,
}

pub struct LimitSwitch<P> {
    pin: P,
    active: ActiveLevel,
    name: &'static str,
    last: bool,
}

impl<P: InputPin> LimitSwitch<P> {
    pub fn new(pin: P, active: ActiveLevel, name: &'static str) -> Self {
        Self {
            pin,
            active,
            name,
            last: false,
        }
    }

    pub fn active_low(pin: P, name: &'static str) -> Self {
        Self::new(pin, ActiveLevel::Low, name)
    }

    /// Read the switch.  `true` = contact closed.
    pub fn try_is_closed(&mut self) -> Result<bool, DeviceError> {
        let high = self
            .pin
            .is_high()
            .map_err(|_| DeviceError::PinRead(self.name))?;
        self.last = match self.active {
            ActiveLevel::High => high,
            ActiveLevel::Low => !high,
        };
        Ok(self.last)
    }

    /// Read the switch, keeping the previous level on a failed read.
    pub fn is_closed(&mut self) -> bool {
        match self.try_is_closed() {
            Ok(closed) => closed,
            Err(e) => {
                warn!("{e}, holding last level");
                self.last
            }
        }
    }
}
