//! Control-loop timing statistics.
//!
//! Collected by the [`ControlLoop`](crate::app::control_loop::ControlLoop)
//! every cycle and reported when operator control ends.  An overrun is a
//! cycle whose body (inputs → state machines → outputs, excluding the
//! sleep) took longer than the configured period.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub cycles: u64,
    pub overruns: u64,
    pub longest: Duration,
    pub total_busy: Duration,
}

impl LoopStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, busy: Duration, period: Duration) {
        self.cycles += 1;
        if busy > period {
            self.overruns += 1;
        }
        self.longest = self.longest.max(busy);
        self.total_busy = self.total_busy.saturating_add(busy);
    }

    /// Average cycle body time; zero before the first cycle.
    pub fn mean_busy(&self) -> Duration {
        match u32::try_from(self.cycles) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_busy / n,
            Err(_) => Duration::from_secs_f64(self.total_busy.as_secs_f64() / self.cycles as f64),
        }
    }
}
