//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in deflect-core on top of the `embedded-hal` and `embedded-io`
//! interfaces:
//!
//! - Hobby servo on a PWM channel
//! - Serial console (command bytes in, diagnostic lines out)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod console;
pub mod servo;
