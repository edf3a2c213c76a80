//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! and hardware-specific implementations.

pub mod console;
pub mod sensor;
pub mod servo;

pub use console::{ByteSource, DiagnosticSink};
pub use sensor::AnalogSensor;
pub use servo::{ActuatorError, ServoActuator};
