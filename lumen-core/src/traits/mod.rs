//! Driver and engine boundary traits
//!
//! The port is written against these traits only. Concrete drivers live in
//! `lumen-drivers`; the graphics engine is an external collaborator.

pub mod backlight;
pub mod engine;
pub mod panel;
pub mod touch;

pub use backlight::Backlight;
pub use engine::{
    DisplayTargetDesc, FlushDone, GraphicsEngine, InputDeviceKind, PointerEvent, PointerState,
    PortCallbacks, RenderMode,
};
pub use panel::{DisplayPanel, FatalError};
pub use touch::TouchController;
