//! Lumen Hardware Abstraction Layer
//!
//! This crate defines the bus and peripheral traits the Lumen drivers are
//! written against. A chip-specific HAL implements them once; the touch,
//! panel and backlight drivers never touch vendor APIs directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lumen-port (render/input composition)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumen-drivers (GT911, ST7701, PWM)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumen-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           chip-specific implementation
//! ```
//!
//! # Sessions
//!
//! Buses are opened through a *host* ([`I2cHost`], [`CommandHost`],
//! [`RgbHost`]) which hands out an owned session value. The driver that
//! opened a session owns it and gives it back to the host exactly once at
//! teardown. Every session config carries a bounded transaction timeout.
//!
//! # Traits
//!
//! - [`i2c::I2cBus`], [`i2c::I2cHost`] - Addressed two-wire bus
//! - [`spi::CommandBus`], [`spi::CommandHost`] - Three-wire panel command bus
//! - [`rgb::RgbPanel`], [`rgb::RgbHost`] - Parallel RGB streaming output
//! - [`pwm::PwmOutput`] - Duty-cycle generator
//! - [`timer::PeriodicTimer`] - Periodic tick source
//! - [`memory::FrameMemory`] - Large frame buffer allocation

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod i2c;
pub mod memory;
pub mod pwm;
pub mod rgb;
pub mod spi;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use i2c::{I2cBus, I2cConfig, I2cHost};
pub use memory::FrameMemory;
pub use pwm::{PwmConfig, PwmOutput};
pub use rgb::{RgbConfig, RgbHost, RgbPanel};
pub use spi::{CommandBus, CommandHost, ThreeWireConfig};
pub use timer::PeriodicTimer;
