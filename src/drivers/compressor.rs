//! Compressor on/off regulation.
//!
//! A pressure switch (closed = tank full) and a relay (spike) driving the
//! compressor motor.  Once started, [`Compressor::regulate`] runs every
//! cycle: relay on while the tank is not full, off otherwise.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

pub struct Compressor<S, R> {
    pressure_switch: S,
    relay: R,
    enabled: bool,
    running: bool,
}

impl<S: InputPin, R: OutputPin> Compressor<S, R> {
    pub fn new(pressure_switch: S, mut relay: R) -> Self {
        if relay.set_low().is_err() {
            warn!("compressor relay: initial write failed");
        }
        Self {
            pressure_switch,
            relay,
            enabled: false,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if !self.enabled {
            info!("Compressor: regulation enabled");
        }
        self.enabled = true;
        self.regulate();
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.drive_relay(false);
    }

    pub fn regulate(&mut self) {
        // An unreadable switch is treated as full.
        let full = match self.pressure_switch.is_high() {
            Ok(full) => full,
            Err(_) => {
                warn!("compressor pressure switch: read failed");
                true
            }
        };
        self.drive_relay(self.enabled && !full);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn drive_relay(&mut self, on: bool) {
        let res = if on {
            self.relay.set_high()
        } else {
            self.relay.set_low()
        };
        match res {
            Ok(()) => self.running = on,
            Err(_) => warn!("compressor relay: write failed"),
        }
    }
}
