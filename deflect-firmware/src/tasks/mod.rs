//! Embassy async tasks
//!
//! The controller is a single cooperative loop; one task owns all of
//! its peripherals.

pub mod control;

pub use control::{control_task, Servo};
