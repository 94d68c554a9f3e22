//! Double-acting solenoid valve.
//!
//! Two valve coils on two solenoid-module channels.  `Forward` energises
//! the forward coil and releases the reverse one; `Reverse` the opposite.
//! The cylinder holds its last position when neither coil changes.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::Position;
use crate::error::DeviceError;

pub struct DoubleSolenoid<P> {
    forward: P,
    reverse: P,
    name: &'static str,
    position: Position,
    /// False after a write that released one coil but failed to
    /// energise the other: neither position is held.
    settled: bool,
}

impl<P: OutputPin> DoubleSolenoid<P> {
    /// Construct and command `initial`.
    pub fn new(forward: P, reverse: P, name: &'static str, initial: Position) -> Self {
        let mut s = Self {
            forward,
            reverse,
            name,
            position: initial,
            settled: false,
        };
        s.set(initial);
        s
    }

    pub fn try_set(&mut self, position: Position) -> Result<(), DeviceError> {
        let name = self.name;
        let err = |_: P::Error| DeviceError::PinWrite(name);
        let (release, energise) = match position {
            Position::Forward => (&mut self.reverse, &mut self.forward),
            Position::Reverse => (&mut self.forward, &mut self.reverse),
        };
        // Release before energise so both coils are never on together.
        release.set_low().map_err(err)?;
        if let Err(e) = energise.set_high() {
            self.settled = false;
            return Err(err(e));
        }
        self.position = position;
        self.settled = true;
        Ok(())
    }

    /// Command a position; a failed write is logged.  A failure before
    /// anything was released keeps the last position.
    pub fn set(&mut self, position: Position) {
        if let Err(e) = self.try_set(position) {
            if self.settled {
                warn!("{e}, valve left at {:?}", self.position);
            } else {
                warn!("{e}, {} released with no coil energised", self.name);
            }
        }
    }

    /// Last successfully commanded position.  Only held while
    /// [`is_settled`](Self::is_settled).
    pub fn get(&self) -> Position {
        self.position
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
