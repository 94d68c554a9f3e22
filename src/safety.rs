//! Safety supervisor.
//!
//! Runs **every cycle after the state machines and before the outputs
//! are written**.  It is the last line of the collector/shooter
//! interlock: if a mechanism command would run the collector together
//! with the shooter or indexer, all three are zeroed for that cycle.
//! It also latches informational flags (arm at a voltage limit, drive
//! watchdog expired) in a fault bitmask reported through telemetry.
//!
//! ## Fault lifecycle
//!
//! 1. A condition is observed; the matching bit is set (logged at `error`).
//! 2. Each cycle the condition is re-evaluated.
//! 3. When it no longer holds the bit is cleared (logged at `info`).
//!
//! Several faults can be active at once.

use crate::control::arm::{ArmCommand, ArmRequest};
use crate::error::SafetyFault;
use crate::fsm::context::MotorCommands;
use log::{error, info};

#[derive(Default)]
pub struct SafetySupervisor {
    /// Latched fault bitmask.
    faults: u8,
    /// Cycles on which an overlapping command was suppressed.
    overlaps_blocked: u32,
}

impl SafetySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check this cycle's mechanism commands, suppressing any overlap.
    /// Returns the updated fault bitmask.
    pub fn enforce(&mut self, motors: &mut MotorCommands, arm: &ArmCommand) -> u8 {
        // ── Collector / shooter overlap ───────────────────────────
        let overlap = motors.collector != 0.0 && (motors.shooter != 0.0 || motors.indexer != 0.0);
        self.eval_fault(SafetyFault::CollectorShooterOverlap, overlap);
        if overlap {
            *motors = MotorCommands::all_off();
            self.overlaps_blocked = self.overlaps_blocked.saturating_add(1);
        }

        // ── Arm limits ────────────────────────────────────────────
        self.eval_fault(
            SafetyFault::ArmUpperLimit,
            arm.request == ArmRequest::Raise && arm.at_limit(),
        );
        self.eval_fault(
            SafetyFault::ArmLowerLimit,
            arm.request == ArmRequest::Lower && arm.at_limit(),
        );

        self.faults
    }

    /// Record the drive watchdog's state for this cycle.
    pub fn set_watchdog_expired(&mut self, expired: bool) {
        self.eval_fault(SafetyFault::DriveWatchdogExpired, expired);
    }

    pub fn faults(&self) -> u8 {
        self.faults
    }

    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    pub fn has_fault(&self, fault: SafetyFault) -> bool {
        self.faults & fault.mask() != 0
    }

    pub fn overlaps_blocked(&self) -> u32 {
        self.overlaps_blocked
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Set or clear a fault bit based on a boolean condition.
    fn eval_fault(&mut self, fault: SafetyFault, condition: bool) {
        if condition {
            if self.faults & fault.mask() == 0 {
                error!("SAFETY FAULT SET: {fault}");
            }
            self.faults |= fault.mask();
        } else {
            if self.faults & fault.mask() != 0 {
                info!("SAFETY FAULT CLEARED: {fault}");
            }
            self.faults &= !fault.mask();
        }
    }
}
