//! Arm rotation and claw locks.
//!
//! The arm is an open-loop bang-bang drive bounded by the rotation
//! potentiometer: full forward to raise while below 4.5 V, full reverse
//! to lower while above 0.5 V, stopped otherwise.  A ±0.1 deadband on
//! the gamepad axis holds the arm still.
//!
//! The two claws are double-acting cylinders (`Forward` = Locked).  They
//! only move on a button's `Closed` edge, and at most one claw command is
//! issued per cycle: claw-1-lock, claw-1-unlock, claw-2-lock,
//! claw-2-unlock, first match wins.

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::{Position, SolenoidId};
use crate::drivers::button::SwitchEvent;
use crate::sensors::{ButtonId, InputSnapshot};

pub const ARM_UPPER_LIMIT_VOLTS: f32 = 4.5;
pub const ARM_LOWER_LIMIT_VOLTS: f32 = 0.5;
pub const ARM_DEADBAND: f32 = 0.1;
pub const ARM_RAISE_SPEED: f32 = 1.0;
pub const ARM_LOWER_SPEED: f32 = -1.0;

// ═══════════════════════════════════════════════════════════════
//  Arm motor
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmRequest {
    Hold,
    /// Stick pushed forward (negative axis).
    Raise,
    /// Stick pulled back.
    Lower,
}

/// One cycle's arm decision.  Not persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmCommand {
    pub request: ArmRequest,
    pub motor: f32,
}

impl ArmCommand {
    /// The operator asked for motion but the voltage guard stopped it.
    pub fn at_limit(&self) -> bool {
        self.request != ArmRequest::Hold && self.motor == 0.0
    }
}

/// Pure function of the current axis and potentiometer samples.
pub fn arm_command(axis: f32, volts: f32) -> ArmCommand {
    if axis < -ARM_DEADBAND {
        ArmCommand {
            request: ArmRequest::Raise,
            motor: if volts < ARM_UPPER_LIMIT_VOLTS { ARM_RAISE_SPEED } else { 0.0 },
        }
    } else if axis > ARM_DEADBAND {
        ArmCommand {
            request: ArmRequest::Lower,
            motor: if volts > ARM_LOWER_LIMIT_VOLTS { ARM_LOWER_SPEED } else { 0.0 },
        }
    } else {
        ArmCommand {
            request: ArmRequest::Hold,
            motor: 0.0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Claws
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClawId {
    /// Green claw.
    Claw1,
    /// Yellow claw.
    Claw2,
}

impl ClawId {
    pub const fn solenoid(self) -> SolenoidId {
        match self {
            Self::Claw1 => SolenoidId::GreenClaw,
            Self::Claw2 => SolenoidId::YellowClaw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClawState {
    Locked,
    #[default]
    Unlocked,
}

impl ClawState {
    pub const fn position(self) -> Position {
        match self {
            Self::Locked => Position::Forward,
            Self::Unlocked => Position::Reverse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClawChange {
    pub claw: ClawId,
    pub state: ClawState,
}

/// The four claw button events for one cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClawEvents {
    pub claw1_lock: SwitchEvent,
    pub claw1_unlock: SwitchEvent,
    pub claw2_lock: SwitchEvent,
    pub claw2_unlock: SwitchEvent,
}

impl ClawEvents {
    pub fn from_snapshot(snap: &InputSnapshot) -> Self {
        Self {
            claw1_lock: snap.event(ButtonId::Claw1Lock),
            claw1_unlock: snap.event(ButtonId::Claw1Unlock),
            claw2_lock: snap.event(ButtonId::Claw2Lock),
            claw2_unlock: snap.event(ButtonId::Claw2Unlock),
        }
    }

    /// First `Closed` edge in priority order.
    fn first_request(&self) -> Option<ClawChange> {
        let ordered = [
            (self.claw1_lock, ClawId::Claw1, ClawState::Locked),
            (self.claw1_unlock, ClawId::Claw1, ClawState::Unlocked),
            (self.claw2_lock, ClawId::Claw2, ClawState::Locked),
            (self.claw2_unlock, ClawId::Claw2, ClawState::Unlocked),
        ];
        ordered
            .into_iter()
            .find(|(event, _, _)| event.is_closed())
            .map(|(_, claw, state)| ClawChange { claw, state })
    }
}

// ═══════════════════════════════════════════════════════════════
//  State machine
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmOutput {
    pub command: ArmCommand,
    /// Claw command to issue this cycle.  May repeat the current state.
    pub claw_change: Option<ClawChange>,
}

pub struct ArmStateMachine {
    claw1: ClawState,
    claw2: ClawState,
}

impl Default for ArmStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ArmStateMachine {
    pub fn new() -> Self {
        Self {
            claw1: ClawState::Unlocked,
            claw2: ClawState::Unlocked,
        }
    }

    pub fn claw(&self, id: ClawId) -> ClawState {
        match id {
            ClawId::Claw1 => self.claw1,
            ClawId::Claw2 => self.claw2,
        }
    }

    /// Both claws unlocked (start of operator control).
    pub fn reset(&mut self) {
        self.claw1 = ClawState::Unlocked;
        self.claw2 = ClawState::Unlocked;
    }

    pub fn update(&mut self, axis: f32, volts: f32, events: &ClawEvents) -> ArmOutput {
        let command = arm_command(axis, volts);
        let claw_change = events.first_request();

        if let Some(change) = claw_change {
            let slot = match change.claw {
                ClawId::Claw1 => &mut self.claw1,
                ClawId::Claw2 => &mut self.claw2,
            };
            if *slot != change.state {
                info!("CLAW | {:?} {:?} -> {:?}", change.claw, *slot, change.state);
                *slot = change.state;
            }
        }

        ArmOutput {
            command,
            claw_change,
        }
    }
}
