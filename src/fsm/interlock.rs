//! Collector/shooter interlock: the robot's one safety-critical invariant.
//!
//! The collector and the shooter/indexer pair are never commanded
//! non-zero at the same time.  The state table in [`super::states`]
//! enforces it; this wrapper owns the engine and its context and adds
//! the same-cycle hand-off: when a collector release returns the table
//! to Idle, a shooter press seen in that same cycle still starts the
//! shooter (the shooter is evaluated after the collector each cycle).

use super::context::{FsmContext, InterlockEvents, MotorCommands};
use super::{Fsm, StateId, states};

pub struct CollectorShooterInterlock {
    fsm: Fsm,
    ctx: FsmContext,
}

impl Default for CollectorShooterInterlock {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectorShooterInterlock {
    pub fn new() -> Self {
        let mut fsm = Fsm::new(states::build_state_table(), StateId::Idle);
        let mut ctx = FsmContext::new();
        fsm.start(&mut ctx);
        Self { fsm, ctx }
    }

    /// Process one cycle's events and return the motor commands to apply.
    pub fn update(&mut self, events: InterlockEvents) -> MotorCommands {
        let before = self.fsm.current_state();
        self.ctx.events = events;
        self.fsm.tick(&mut self.ctx);

        if before == StateId::CollectorRunning
            && self.fsm.current_state() == StateId::Idle
            && events.shooter.is_closed()
        {
            self.fsm
                .force_transition(StateId::ShooterRunning, &mut self.ctx);
        }

        self.ctx.commands
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn commands(&self) -> MotorCommands {
        self.ctx.commands
    }

    pub fn collector_running(&self) -> bool {
        self.state() == StateId::CollectorRunning
    }

    pub fn shooter_running(&self) -> bool {
        self.state() == StateId::ShooterRunning
    }

    pub fn ticks_in_state(&self) -> u64 {
        self.fsm.ticks_in_current_state()
    }

    /// Return to Idle with every motor off.
    pub fn reset(&mut self) {
        self.fsm.force_transition(StateId::Idle, &mut self.ctx);
    }
}
