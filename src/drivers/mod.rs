//! Device drivers: edge detection, motors, valves, compressor, joysticks
//! and the drive watchdog.

pub mod button;
pub mod compressor;
pub mod joystick;
pub mod motor;
pub mod solenoid;
pub mod watchdog;
