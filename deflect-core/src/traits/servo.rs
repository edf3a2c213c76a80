//! Servo actuator trait

/// Errors that can occur when driving the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// PWM peripheral rejected the duty cycle
    PwmError,
}

/// Trait for single-axis angle-controlled actuators
pub trait ServoActuator {
    /// Command the actuator to an absolute angle in degrees
    fn write_angle(&mut self, angle: u8) -> Result<(), ActuatorError>;
}
