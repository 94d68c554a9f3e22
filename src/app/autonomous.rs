//! Autonomous routine: open-loop timed drive.
//!
//! Drive both sides at a fixed output for a fixed time, then stop.  No
//! sensors are read.  The drive watchdog must be disabled while this
//! runs since the output is written once and held.

use std::time::Duration;

use log::info;

use crate::config::RobotConfig;
use crate::control::drive::{SideOutputs, straight};

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedDrive {
    speed: f32,
    duration: Duration,
}

impl TimedDrive {
    pub fn new(speed: f32, duration: Duration) -> Self {
        Self { speed, duration }
    }

    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(
            config.autonomous_speed,
            Duration::from_millis(u64::from(config.autonomous_duration_ms)),
        )
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Drive, hold for the duration via `wait`, stop.
    pub fn run(
        &self,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
        mut wait: impl FnMut(Duration),
    ) {
        let out = straight(self.speed);
        info!(
            "AUTO | driving {:+.2} for {} ms",
            out.left,
            self.duration.as_millis()
        );
        sink.emit(&AppEvent::AutonomousStarted {
            speed: out.left,
            duration_ms: u32::try_from(self.duration.as_millis()).unwrap_or(u32::MAX),
        });

        hw.set_drive(out.left, out.right);
        wait(self.duration);
        hw.set_drive(SideOutputs::STOPPED.left, SideOutputs::STOPPED.right);

        sink.emit(&AppEvent::AutonomousFinished);
        info!("AUTO | done");
    }
}
