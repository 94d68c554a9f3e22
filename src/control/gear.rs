//! Two-speed transmission state machine.
//!
//! The shifter is a double-acting cylinder: `Forward` = High gear,
//! `Reverse` = Low gear.  Two shift strategies exist and exactly one is
//! active for the lifetime of the loop:
//!
//! - **Manual**: the shift button's `Closed` edge selects High and its
//!   `Opened` edge selects Low (hold for high gear).
//! - **Automatic**: throttle position with a hysteresis band.  In Low,
//!   `y < -0.25` upshifts; in High, `y > -0.2` downshifts.

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::Position;
use crate::drivers::button::SwitchEvent;

/// Low gear upshifts when the throttle axis drops below this value.
pub const UPSHIFT_BELOW: f32 = -0.25;
/// High gear downshifts when the throttle axis rises above this value.
pub const DOWNSHIFT_ABOVE: f32 = -0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GearState {
    /// High torque.  Commanded at start-up.
    #[default]
    Low,
    /// High speed.
    High,
}

impl GearState {
    /// Solenoid position that selects this gear.
    pub const fn position(self) -> Position {
        match self {
            Self::Low => Position::Reverse,
            Self::High => Position::Forward,
        }
    }

    pub const fn from_position(position: Position) -> Self {
        match position {
            Position::Forward => Self::High,
            Position::Reverse => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearShiftMode {
    #[default]
    Manual,
    Automatic,
}

pub struct GearShiftStateMachine {
    mode: GearShiftMode,
    gear: GearState,
    shifts: u32,
}

impl GearShiftStateMachine {
    pub fn new(mode: GearShiftMode) -> Self {
        Self {
            mode,
            gear: GearState::Low,
            shifts: 0,
        }
    }

    pub fn gear(&self) -> GearState {
        self.gear
    }

    pub fn mode(&self) -> GearShiftMode {
        self.mode
    }

    /// Completed shifts since construction.
    pub fn shift_count(&self) -> u32 {
        self.shifts
    }

    /// Force Low gear without counting a shift (start of operator control).
    pub fn reset(&mut self) {
        self.gear = GearState::Low;
    }

    /// Run the configured strategy.  Returns the new gear only when a
    /// shift happened; the caller issues exactly one solenoid command for it.
    pub fn update(&mut self, shift_event: SwitchEvent, axis_y: f32) -> Option<GearState> {
        match self.mode {
            GearShiftMode::Manual => self.update_manual(shift_event),
            GearShiftMode::Automatic => self.update_automatic(axis_y),
        }
    }

    pub fn update_manual(&mut self, shift_event: SwitchEvent) -> Option<GearState> {
        let target = match shift_event {
            SwitchEvent::Closed => GearState::High,
            SwitchEvent::Opened => GearState::Low,
            SwitchEvent::None => return None,
        };
        self.shift_to(target)
    }

    pub fn update_automatic(&mut self, axis_y: f32) -> Option<GearState> {
        match self.gear {
            GearState::Low if axis_y < UPSHIFT_BELOW => self.shift_to(GearState::High),
            GearState::High if axis_y > DOWNSHIFT_ABOVE => self.shift_to(GearState::Low),
            _ => None,
        }
    }

    fn shift_to(&mut self, target: GearState) -> Option<GearState> {
        if target == self.gear {
            return None;
        }
        info!("GEAR | {:?} -> {:?}", self.gear, target);
        self.gear = target;
        self.shifts = self.shifts.saturating_add(1);
        Some(target)
    }
}
