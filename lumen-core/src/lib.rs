//! Board-agnostic core of the Lumen touch panel stack
//!
//! This crate contains everything that does not depend on a specific bus
//! implementation:
//!
//! - Panel geometry and the reference board configuration
//! - Touch sample and controller identification types
//! - Engine-side rectangles and their conversion to blit rectangles
//! - The logical clock shared between the tick source and the main pump
//! - Driver traits (touch, panel, backlight) and the graphics-engine boundary

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod area;
pub mod clock;
pub mod config;
pub mod touch;
pub mod traits;

pub use area::{Area, BlitRect};
pub use clock::LogicalClock;
pub use config::{ColorFormat, GeometryError, MemoryAccess, PanelGeometry};
pub use touch::{ControllerInfo, TouchPoint, TouchPoints, TouchSample, MAX_TOUCH_POINTS};
pub use traits::{
    Backlight, DisplayPanel, DisplayTargetDesc, FatalError, FlushDone, GraphicsEngine,
    InputDeviceKind, PointerEvent, PointerState, PortCallbacks, RenderMode, TouchController,
};
