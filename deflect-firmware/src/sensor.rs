//! ADC-backed position sensor

use defmt::*;
use embassy_rp::adc::{Adc, Blocking, Channel};

use deflect_core::traits::AnalogSensor;

use crate::board::ADC_SHIFT;

/// Position sensor on an RP2040 ADC channel
///
/// Samples are scaled down to the 10-bit range the sensor bands use.
/// A failed conversion repeats the last good sample.
pub struct AdcSensor {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
    last: u16,
}

impl AdcSensor {
    /// Create a sensor on an ADC channel
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self {
            adc,
            channel,
            last: 0,
        }
    }
}

impl AnalogSensor for AdcSensor {
    fn read_raw(&mut self) -> u16 {
        match self.adc.blocking_read(&mut self.channel) {
            Ok(raw) => self.last = raw >> ADC_SHIFT,
            Err(e) => warn!("ADC read failed: {:?}", e),
        }
        self.last
    }
}
