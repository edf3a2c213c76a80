//! Hobby servo driver on a PWM channel
//!
//! Maps an angle in degrees to a pulse width inside a fixed frame period
//! and hands the resulting duty cycle to any `embedded-hal` PWM channel.
//!
//! # Usage
//!
//! ```ignore
//! let mut servo = PwmServo::new(pwm_channel, ServoConfig::default());
//! servo.write_angle(93)?;
//! ```

use deflect_core::traits::{ActuatorError, ServoActuator};
use embedded_hal::pwm::SetDutyCycle;

/// Servo pulse timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    /// Pulse width at 0 degrees (µs)
    pub min_pulse_us: u16,
    /// Pulse width at full travel (µs)
    pub max_pulse_us: u16,
    /// Frame period (µs), 20 ms for 50 Hz servos
    pub period_us: u16,
    /// Angle reached at `max_pulse_us`
    pub travel_deg: u8,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 544,
            max_pulse_us: 2400,
            period_us: 20_000,
            travel_deg: 180,
        }
    }
}

impl ServoConfig {
    /// Pulse width for an angle, clamped to full travel
    pub fn pulse_us(&self, angle: u8) -> u16 {
        let angle = angle.min(self.travel_deg) as u32;
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us) as u32;
        let travel = self.travel_deg.max(1) as u32;
        self.min_pulse_us + (span * angle / travel) as u16
    }
}

/// Servo on a PWM channel
pub struct PwmServo<P> {
    pwm: P,
    config: ServoConfig,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a servo driver; nothing is written until the first angle
    pub fn new(pwm: P, config: ServoConfig) -> Self {
        Self { pwm, config }
    }
}

impl<P: SetDutyCycle> ServoActuator for PwmServo<P> {
    fn write_angle(&mut self, angle: u8) -> Result<(), ActuatorError> {
        let pulse = self.config.pulse_us(angle);
        self.pwm
            .set_duty_cycle_fraction(pulse, self.config.period_us)
            .map_err(|_| ActuatorError::PwmError)
    }
}
