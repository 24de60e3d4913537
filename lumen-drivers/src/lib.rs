//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lumen-core for the reference board:
//!
//! - Touch: GT911 capacitive controller over I2C
//! - Panel: ST7701 RGB panel (3-wire command bring-up + RGB streaming)
//! - Backlight: PWM duty-cycle actuator

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod backlight;
pub mod panel;
pub mod touch;

pub use backlight::{BacklightError, PwmBacklight, PwmBacklightConfig};
pub use panel::{InitCommand, InitStep, St7701, St7701Error};
pub use touch::{Gt911, Gt911Config, Gt911Error};
