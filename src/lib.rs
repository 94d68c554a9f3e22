//! Wham-O robot control library.
//!
//! Edge-triggered operator inputs feeding a handful of interlocked
//! state machines (collector/shooter interlock, gear shifter, arm and
//! claws), run from a fixed-period control loop.  Hardware sits behind
//! port traits; the `adapters` module provides the device-generic
//! hardware adapter and a simulated robot for host runs and tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod safety;
pub mod sensors;
