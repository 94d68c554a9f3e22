//! Driver-station joysticks and gamepads.
//!
//! Axis numbers are zero-based and button numbers one-based, as printed
//! on the controllers.  The trait is all the hardware adapter needs;
//! edge detection happens above it in the input snapshot.

pub trait Joystick {
    /// Raw axis reading.  Nominally `[-1.0, 1.0]`.
    fn raw_axis(&mut self, axis: u8) -> f32;

    /// `true` while the button is held.
    fn raw_button(&mut self, button: u8) -> bool;
}

/// Axis value limited to `[-1.0, 1.0]`; NaN reads as centred.
pub fn axis<J: Joystick + ?Sized>(stick: &mut J, axis: u8) -> f32 {
    let v = stick.raw_axis(axis);
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}
