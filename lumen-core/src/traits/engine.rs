//! Graphics engine boundary
//!
//! The engine is a retained-mode renderer owned by the application. The
//! port needs only a few hooks from it: register/unregister a display
//! target and an input device, advance its logical clock, and run one
//! scheduler pass. During that pass the engine calls back into the port
//! through [`PortCallbacks`], synchronously and never re-entrantly.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::area::Area;
use crate::config::ColorFormat;

/// How the engine uses the registered buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RenderMode {
    /// One buffer the size of the screen; each flush covers the dirty region at once
    #[default]
    Full,
    /// Buffer smaller than the screen, rendered in bands
    Partial,
}

/// Display target registration parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DisplayTargetDesc {
    pub width: u16,
    pub height: u16,
    pub color_format: ColorFormat,
    pub render_mode: RenderMode,
    /// Size of the bound render buffer in bytes
    pub buffer_len: usize,
}

/// Input device type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum InputDeviceKind {
    /// Touchpad or mouse
    Pointer,
    /// Rotary encoder
    Encoder,
    /// Keys
    Keypad,
}

/// Pointer button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PointerState {
    #[default]
    Released,
    Pressed,
}

/// One pointer reading handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PointerEvent {
    pub state: PointerState,
    pub x: u16,
    pub y: u16,
}

impl PointerEvent {
    /// Pressed at `(x, y)`
    pub const fn pressed(x: u16, y: u16) -> Self {
        Self {
            state: PointerState::Pressed,
            x,
            y,
        }
    }

    /// Released at `(x, y)`
    pub const fn released(x: u16, y: u16) -> Self {
        Self {
            state: PointerState::Released,
            x,
            y,
        }
    }

    /// Check if the pointer is down
    pub fn is_pressed(&self) -> bool {
        self.state == PointerState::Pressed
    }
}

/// Flush-complete signal
///
/// Returned by [`PortCallbacks::flush`]. The engine may reuse the flushed
/// pixels only after it has received this token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub struct FlushDone;

/// Hooks the engine calls during [`GraphicsEngine::run`]
pub trait PortCallbacks {
    /// Push an inclusive dirty area to the display
    ///
    /// `pixels` holds the area's pixels, row-major. Always returns
    /// [`FlushDone`], even when the transfer failed.
    fn flush(&mut self, area: &Area, pixels: &[u8]) -> FlushDone;

    /// Read the pointer device
    fn poll(&mut self) -> PointerEvent;
}

/// Capabilities the port consumes from the graphics engine
pub trait GraphicsEngine {
    /// Engine error
    type Error;

    /// Bind the render buffer as the engine's display target
    fn register_display_target(&mut self, desc: &DisplayTargetDesc) -> Result<(), Self::Error>;

    /// Drop the display target
    fn unregister_display_target(&mut self);

    /// Register an input device polled through [`PortCallbacks::poll`]
    fn register_input_device(&mut self, kind: InputDeviceKind) -> Result<(), Self::Error>;

    /// Drop the input device
    fn unregister_input_device(&mut self);

    /// Advance the engine's logical clock
    fn advance_clock(&mut self, delta_ms: u32);

    /// Run one scheduler pass: poll inputs, render into `frame`, flush dirty areas
    fn run(&mut self, frame: &mut [u8], callbacks: &mut dyn PortCallbacks)
        -> Result<(), Self::Error>;
}
