//! Table-driven state machine for the collector/shooter interlock.
//!
//! One row per state, plain function pointers, no allocation:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌──────────────────┬───────────┬──────────┬─────────────────┐ │
//! │  │ StateId          │ on_enter  │ on_exit  │ on_update       │ │
//! │  ├──────────────────┼───────────┼──────────┼─────────────────┤ │
//! │  │ Idle             │ fn(ctx)   │ —        │ fn(ctx)->Option │ │
//! │  │ CollectorRunning │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  │ ShooterRunning   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  └──────────────────┴───────────┴──────────┴─────────────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut FsmContext`, which
//! holds the cycle's input events and the motor commands.
//!
//! The table drives the collector/shooter interlock; see
//! [`interlock::CollectorShooterInterlock`] for the wrapper the control
//! service owns.

pub mod context;
pub mod interlock;
pub mod states;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Interlock state.  There is no combined collector+shooter state.
/// Discriminants are row indices into [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    CollectorRunning = 1,
    ShooterRunning = 2,
}

impl StateId {
    /// Rows in the state table.
    pub const COUNT: usize = 3;

    /// Table index back to `StateId`.  An out-of-range index is a bug
    /// (debug assert); release builds fall back to `Idle`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::CollectorRunning,
            2 => Self::ShooterRunning,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// `on_enter` / `on_exit`: set or clear the state's motor commands.
pub type StateActionFn = fn(&mut FsmContext);

/// Reads the cycle's edge events; `Some(next)` leaves the state.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// One row of the state table: a state's name and its three hooks.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// Runs the state table one control cycle at a time.
pub struct Fsm {
    table: [StateDescriptor; StateId::COUNT],
    /// Row of the active state.
    current: usize,
    tick_count: u64,
    /// Value of `tick_count` when `current` was entered.
    state_entry_tick: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Enter the initial state.  Must run once before the first cycle.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("INTERLOCK | start in {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance one cycle.  The active state's update hook picks the
    /// successor, if any, and the exit/enter hooks run around the move.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        ctx.total_ticks = self.tick_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Move to `next` without consulting the update hook.  Moving to the
    /// active state runs no hooks.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "INTERLOCK | {} -> {} after {} cycles",
            self.table[self.current].name,
            self.table[next_idx].name,
            self.tick_count - self.state_entry_tick
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
