//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the "blackboard" the state handlers read from and
//! write to: this cycle's input events, the motor commands they
//! produce, and tick timing.

use crate::drivers::button::SwitchEvent;
use crate::sensors::{ButtonId, InputSnapshot};

pub const COLLECTOR_FORWARD_SPEED: f32 = 1.0;
pub const COLLECTOR_REVERSE_SPEED: f32 = -1.0;
pub const SHOOTER_SPEED: f32 = -0.5;
pub const INDEXER_SPEED: f32 = -0.5;

// ---------------------------------------------------------------------------
// Inputs (written before each tick)
// ---------------------------------------------------------------------------

/// The edge events the interlock consumes, for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterlockEvents {
    pub collector_forward: SwitchEvent,
    pub collector_reverse: SwitchEvent,
    pub shooter: SwitchEvent,
    pub index_switch: SwitchEvent,
}

impl InterlockEvents {
    pub fn from_snapshot(snap: &InputSnapshot) -> Self {
        Self {
            collector_forward: snap.event(ButtonId::CollectorForward),
            collector_reverse: snap.event(ButtonId::CollectorReverse),
            shooter: snap.event(ButtonId::Shooter),
            index_switch: snap.event(ButtonId::IndexSwitch),
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs (read after each tick)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorCommands {
    pub collector: f32,
    pub shooter: f32,
    pub indexer: f32,
}

impl MotorCommands {
    pub fn all_off() -> Self {
        Self::default()
    }

    pub fn is_all_off(&self) -> bool {
        self.collector == 0.0 && self.shooter == 0.0 && self.indexer == 0.0
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    pub total_ticks: u64,

    pub events: InterlockEvents,

    /// Collector output applied when `CollectorRunning` is entered.
    /// Set by the handler that requests the transition.
    pub collector_speed: f32,

    pub commands: MotorCommands,
}

impl Default for FsmContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FsmContext {
    pub fn new() -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            events: InterlockEvents::default(),
            collector_speed: COLLECTOR_FORWARD_SPEED,
            commands: MotorCommands::all_off(),
        }
    }
}
