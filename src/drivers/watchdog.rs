//! Drive motor-safety watchdog.
//!
//! The drivetrain must be refreshed at least once per expiration window
//! (100 ms by default) while safety is enabled.  A stalled loop that
//! misses the window gets its drive motors stopped by the caller.
//! Disabled during autonomous, where the drive is set once and held.

use std::time::{Duration, Instant};

use log::warn;

pub struct MotorSafety {
    expiration: Duration,
    enabled: bool,
    last_feed: Option<Instant>,
    expirations: u32,
}

impl MotorSafety {
    pub fn new(expiration: Duration) -> Self {
        Self {
            expiration,
            enabled: false,
            last_feed: None,
            expirations: 0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.last_feed = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Record a drive update at `now`.
    pub fn feed(&mut self, now: Instant) {
        self.last_feed = Some(now);
    }

    /// `true` if enabled and the last feed is older than the window.
    /// Never expires before the first feed.
    pub fn check(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(last) = self.last_feed else {
            return false;
        };
        let late = now.saturating_duration_since(last);
        if late > self.expiration {
            warn!(
                "Motor safety: drive not updated for {} ms (limit {} ms)",
                late.as_millis(),
                self.expiration.as_millis()
            );
            self.expirations = self.expirations.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn expirations(&self) -> u32 {
        self.expirations
    }
}
