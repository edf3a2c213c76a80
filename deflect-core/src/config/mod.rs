//! Configuration types
//!
//! Board-agnostic controller tunables. The firmware bakes these in at
//! build time; nothing here is changed at runtime.

pub mod types;

pub use types::*;
