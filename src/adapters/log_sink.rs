//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events
//! through the `log` facade.  Telemetry goes out at `debug` since it is
//! emitted every few milliseconds; everything else at `info`.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                debug!(
                    "TELEM | #{} {:?} {:?} | drive={:+.2}/{:+.2} | coll={:+.1} shoot={:+.1} \
                     idx={:+.1} | arm={:+.1} @ {:.2}V | claws={:?}/{:?} | faults=0b{:08b}",
                    t.cycle,
                    t.interlock,
                    t.gear,
                    t.drive_left,
                    t.drive_right,
                    t.collector,
                    t.shooter,
                    t.indexer,
                    t.arm_motor,
                    t.arm_voltage,
                    t.claw1,
                    t.claw2,
                    t.fault_flags,
                );
            }
            AppEvent::InterlockChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::GearShifted(gear) => {
                info!("GEAR | now {:?}", gear);
            }
            AppEvent::ClawChanged { claw, state } => {
                info!("CLAW | {:?} {:?}", claw, state);
            }
            AppEvent::FaultDetected(flags) => {
                info!("FAULT | detected, flags=0b{:08b}", flags);
            }
            AppEvent::FaultCleared => {
                info!("FAULT | all cleared");
            }
            AppEvent::WatchdogExpired => {
                warn!("WATCHDOG | drive outputs stale, motors stopped");
            }
            AppEvent::AutonomousStarted { speed, duration_ms } => {
                info!("AUTO | start speed={:+.2} for {} ms", speed, duration_ms);
            }
            AppEvent::AutonomousFinished => {
                info!("AUTO | finished");
            }
            AppEvent::Started => {
                info!("START | operator control");
            }
            AppEvent::Stopped(stats) => {
                info!(
                    "STOP | cycles={} overruns={} longest={}us mean={}us",
                    stats.cycles,
                    stats.overruns,
                    stats.longest.as_micros(),
                    stats.mean_busy().as_micros()
                );
            }
        }
    }
}
