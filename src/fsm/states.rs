//! Interlock state handlers and table builder.
//!
//! ```text
//!            [fwd closed / rev closed]
//!   IDLE ─────────────────────────────▶ COLLECTOR_RUNNING
//!    │ ▲ ◀──────[fwd opened / rev opened]───────┘
//!    │ │
//!    │ └──────[index switch closed]──────┐
//!    │                                   │
//!    └──────[shooter closed]──────▶ SHOOTER_RUNNING
//! ```
//!
//! While the collector runs the shooter button is ignored.  While the
//! shooter runs every collector input is ignored, and only a disk
//! reaching the index switch returns to Idle.

use super::context::{
    COLLECTOR_FORWARD_SPEED, COLLECTOR_REVERSE_SPEED, FsmContext, INDEXER_SPEED, SHOOTER_SPEED,
};
use super::{StateDescriptor, StateId};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: CollectorRunning
        StateDescriptor {
            id: StateId::CollectorRunning,
            name: "CollectorRunning",
            on_enter: Some(collector_enter),
            on_exit: Some(collector_exit),
            on_update: collector_update,
        },
        // Index 2: ShooterRunning
        StateDescriptor {
            id: StateId::ShooterRunning,
            name: "ShooterRunning",
            on_enter: Some(shooter_enter),
            on_exit: Some(shooter_exit),
            on_update: shooter_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands.collector = 0.0;
    ctx.commands.shooter = 0.0;
    ctx.commands.indexer = 0.0;
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    let ev = ctx.events;

    // Same chain as CollectorRunning: a forward release ends the chain
    // for this cycle, so a reverse press seen with it is dropped.  The
    // shooter is still evaluated afterwards.
    let collector = if ev.collector_forward.is_closed() {
        Some(COLLECTOR_FORWARD_SPEED)
    } else if ev.collector_forward.is_opened() {
        None
    } else if ev.collector_reverse.is_closed() {
        Some(COLLECTOR_REVERSE_SPEED)
    } else {
        None
    };
    if let Some(speed) = collector {
        ctx.collector_speed = speed;
        return Some(StateId::CollectorRunning);
    }
    if ev.shooter.is_closed() {
        return Some(StateId::ShooterRunning);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  COLLECTOR_RUNNING: buttons must be held
// ═══════════════════════════════════════════════════════════════════════════

fn collector_enter(ctx: &mut FsmContext) {
    ctx.commands.shooter = 0.0;
    ctx.commands.indexer = 0.0;
    ctx.commands.collector = ctx.collector_speed;
    info!("COLLECTOR: running at {:+.1}", ctx.collector_speed);
}

fn collector_exit(ctx: &mut FsmContext) {
    ctx.commands.collector = 0.0;
}

fn collector_update(ctx: &mut FsmContext) -> Option<StateId> {
    let ev = ctx.events;

    // First match wins, same order as a press/release chain on one pad.
    if ev.collector_forward.is_closed() {
        set_collector(ctx, COLLECTOR_FORWARD_SPEED);
        None
    } else if ev.collector_forward.is_opened() {
        Some(StateId::Idle)
    } else if ev.collector_reverse.is_closed() {
        set_collector(ctx, COLLECTOR_REVERSE_SPEED);
        None
    } else if ev.collector_reverse.is_opened() {
        Some(StateId::Idle)
    } else {
        if ev.shooter.is_closed() {
            debug!("COLLECTOR: shooter request ignored while collecting");
        }
        None
    }
}

fn set_collector(ctx: &mut FsmContext, speed: f32) {
    if ctx.commands.collector != speed {
        info!("COLLECTOR: direction {:+.1} -> {:+.1}", ctx.commands.collector, speed);
    }
    ctx.collector_speed = speed;
    ctx.commands.collector = speed;
}

// ═══════════════════════════════════════════════════════════════════════════
//  SHOOTER_RUNNING: stops on the index switch, not on button release
// ═══════════════════════════════════════════════════════════════════════════

fn shooter_enter(ctx: &mut FsmContext) {
    ctx.commands.collector = 0.0;
    ctx.commands.shooter = SHOOTER_SPEED;
    ctx.commands.indexer = INDEXER_SPEED;
    info!("SHOOTER: spinning up, indexer feeding");
}

fn shooter_exit(ctx: &mut FsmContext) {
    ctx.commands.shooter = 0.0;
    ctx.commands.indexer = 0.0;
    info!("SHOOTER: disk indexed after {} ticks", ctx.ticks_in_state);
}

fn shooter_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.events.index_switch.is_closed() {
        return Some(StateId::Idle);
    }
    None
}
