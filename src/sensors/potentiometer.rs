//! Arm rotation potentiometer.
//!
//! The wiper feeds a 12-bit analog channel referenced to 5 V.  The
//! driver converts raw counts to volts; the arm state machine works in
//! volts so its limits stay readable (0.5 V lower, 4.5 V upper).

/// A raw analog channel.
pub trait AnalogInput {
    /// Latest conversion, `0 ..= FULL_SCALE_COUNTS`.
    fn read_raw(&mut self) -> u16;
}

/// Full-scale count of the 12-bit converter.
pub const FULL_SCALE_COUNTS: u16 = 4095;
/// Reference voltage of the analog module.
pub const REFERENCE_VOLTS: f32 = 5.0;

pub struct Potentiometer<A> {
    adc: A,
    last_raw: u16,
}

impl<A: AnalogInput> Potentiometer<A> {
    pub fn new(adc: A) -> Self {
        Self { adc, last_raw: 0 }
    }

    /// Sample the channel and return the wiper voltage.
    pub fn voltage(&mut self) -> f32 {
        self.last_raw = self.adc.read_raw().min(FULL_SCALE_COUNTS);
        counts_to_volts(self.last_raw)
    }

    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }
}

pub fn counts_to_volts(raw: u16) -> f32 {
    f32::from(raw.min(FULL_SCALE_COUNTS)) * REFERENCE_VOLTS / f32::from(FULL_SCALE_COUNTS)
}

/// Inverse of [`counts_to_volts`], clamped to the converter range.
pub fn volts_to_counts(volts: f32) -> u16 {
    let scaled = (volts / REFERENCE_VOLTS) * f32::from(FULL_SCALE_COUNTS);
    scaled.round().clamp(0.0, f32::from(FULL_SCALE_COUNTS)) as u16
}
