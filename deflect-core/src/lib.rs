//! Board-agnostic core logic for the deflect servo controller
//!
//! This crate contains all control logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (analog sensor, servo, serial console)
//! - Sensor sampler (windowed averaging)
//! - Position decision engine (two-sample confirmation, idle wiggle)
//! - Serial command interpreter
//! - Controller tick orchestration
//! - Configuration type definitions and validation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod controller;
pub mod decision;
pub mod diagnostics;
pub mod sampler;
pub mod traits;

pub use config::{ConfigError, ControllerConfig};
pub use controller::{Controller, ServoMove, TickPlan};
pub use diagnostics::Diagnostic;
