//! Analog position sensor trait

/// Trait for the analog proximity/position sensor
///
/// Readings are passed through unvalidated; the band thresholds are
/// expressed in a 10-bit range (0-1023).
pub trait AnalogSensor {
    /// Take one raw sample
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_raw(&mut self) -> u16;
}
