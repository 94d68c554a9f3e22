//! Application core: pure domain logic, zero direct I/O.
//!
//! The control cycle, the loop that drives it, and the autonomous
//! routine.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without a robot.

pub mod autonomous;
pub mod control_loop;
pub mod events;
pub mod ports;
pub mod service;
