//! Configuration types
//!
//! Build-time configuration only. Nothing here is loaded or stored at
//! runtime; the reference board lives in [`board`] and
//! [`PanelGeometry::BOARD`].

pub mod board;
pub mod panel;

pub use panel::{
    ColorFormat, CommandPins, GeometryError, MemoryAccess, PanelGeometry, PanelTiming, RgbPins,
    SyncFlags,
};
