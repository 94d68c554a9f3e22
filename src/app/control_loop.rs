//! Fixed-period control loop.
//!
//! Runs the autonomous routine, then operator control: one
//! [`RobotService::tick`] per iteration followed by a fixed sleep, until
//! the driver station's mode signal drops.  The mode signal is checked
//! once per iteration; a cycle in progress always completes.
//!
//! The loop also owns the drive motor-safety watchdog and the cycle
//! timing statistics.

use std::time::{Duration, Instant};

use log::info;

use crate::config::RobotConfig;
use crate::diagnostics::LoopStats;
use crate::drivers::watchdog::MotorSafety;

use super::autonomous::TimedDrive;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, InputPort, ModePort};
use super::service::RobotService;

pub struct ControlLoop {
    period: Duration,
    watchdog: MotorSafety,
    stats: LoopStats,
    sleep: fn(Duration),
}

impl ControlLoop {
    pub fn new(config: &RobotConfig) -> Self {
        Self {
            period: Duration::from_millis(u64::from(config.loop_interval_ms)),
            watchdog: MotorSafety::new(Duration::from_millis(u64::from(
                config.drive_expiration_ms,
            ))),
            stats: LoopStats::new(),
            sleep: spin_sleep::sleep,
        }
    }

    /// Replace the inter-cycle sleep (tests and fast simulation).
    #[must_use]
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn watchdog_enabled(&self) -> bool {
        self.watchdog.is_enabled()
    }

    /// Run the timed drive with motor safety disabled.
    pub fn run_autonomous(
        &mut self,
        routine: &TimedDrive,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        self.watchdog.set_enabled(false);
        routine.run(hw, sink, self.sleep);
    }

    /// Operator control.  Returns the loop statistics when the mode
    /// signal drops; every motor is stopped on the way out.
    pub fn run_operator_control(
        &mut self,
        service: &mut RobotService,
        hw: &mut (impl InputPort + ActuatorPort),
        mode: &mut impl ModePort,
        sink: &mut impl EventSink,
    ) -> LoopStats {
        self.stats = LoopStats::new();
        self.watchdog.set_enabled(true);
        service.start(hw, sink);
        info!(
            "Operator control: period {} ms, drive expiration {} ms",
            self.period.as_millis(),
            self.watchdog.expiration().as_millis()
        );

        while mode.is_operator_control() {
            let started = Instant::now();

            // A late cycle stops the drive for this tick; the service
            // resumes normal drive once the next feed is on time.
            let expired = self.watchdog.check(started);
            if expired {
                sink.emit(&AppEvent::WatchdogExpired);
            }
            service.set_watchdog_expired(expired, sink);

            service.tick(hw, sink);

            let finished = Instant::now();
            self.watchdog.feed(finished);
            self.stats.record(finished - started, self.period);

            (self.sleep)(self.period);
        }

        self.watchdog.set_enabled(false);
        hw.all_off();
        info!(
            "Operator control ended after {} cycles ({} overruns, longest {} us)",
            self.stats.cycles,
            self.stats.overruns,
            self.stats.longest.as_micros()
        );
        sink.emit(&AppEvent::Stopped(self.stats));
        self.stats
    }
}
