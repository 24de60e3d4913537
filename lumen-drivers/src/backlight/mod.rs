//! Backlight drivers

pub mod pwm;

pub use pwm::{BacklightError, PwmBacklight, PwmBacklightConfig};
