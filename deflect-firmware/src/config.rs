//! Compiled-in configuration
//!
//! Generated by `build.rs` from `deflect.toml`, which is validated at
//! build time. Nothing here changes at runtime.

use deflect_core::config::{ControllerConfig, SensorBand};
use deflect_drivers::servo::ServoConfig;

include!(concat!(env!("OUT_DIR"), "/deflect_config.rs"));
