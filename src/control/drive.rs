//! Drive stick shaping and arcade mixing.
//!
//! The throttle axis is squared with its sign kept (`y * |y|`) for finer
//! low-speed control, then scaled by a gear-dependent gain: ×4 in Low,
//! ×1 in High.  The turn axis passes through untouched.  Arcade mixing
//! then limits both to [-1, 1] and produces left/right side outputs.

use super::gear::GearState;

pub const LOW_GEAR_GAIN: f32 = 4.0;
pub const HIGH_GEAR_GAIN: f32 = 1.0;

/// Throttle/turn pair before mixing.  The throttle may exceed 1.0 in Low
/// gear; mixing clamps it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    pub throttle: f32,
    pub turn: f32,
}

/// Per-side motor outputs, each in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideOutputs {
    pub left: f32,
    pub right: f32,
}

impl SideOutputs {
    pub const STOPPED: Self = Self {
        left: 0.0,
        right: 0.0,
    };
}

pub const fn gear_gain(gear: GearState) -> f32 {
    match gear {
        GearState::Low => LOW_GEAR_GAIN,
        GearState::High => HIGH_GEAR_GAIN,
    }
}

/// Shape the operator's stick into a throttle/turn command.
pub fn compute_drive(axis_y: f32, axis_x: f32, gear: GearState) -> DriveCommand {
    let throttle = if axis_y == 0.0 {
        0.0
    } else {
        axis_y * axis_y * axis_y.signum() * gear_gain(gear)
    };
    DriveCommand {
        throttle,
        turn: axis_x,
    }
}

/// Classic single-stick arcade mix.
pub fn arcade_mix(cmd: DriveCommand) -> SideOutputs {
    let mv = limit(cmd.throttle);
    let rot = limit(cmd.turn);

    let (left, right) = if mv > 0.0 {
        if rot > 0.0 {
            (mv - rot, mv.max(rot))
        } else {
            (mv.max(-rot), mv + rot)
        }
    } else if rot > 0.0 {
        (-(-mv).max(rot), mv + rot)
    } else {
        (mv - rot, -(-mv).max(-rot))
    };

    SideOutputs {
        left: limit(left),
        right: limit(right),
    }
}

/// Straight open-loop drive at `magnitude` (autonomous).
pub fn straight(magnitude: f32) -> SideOutputs {
    let m = limit(magnitude);
    SideOutputs { left: m, right: m }
}

fn limit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}
