//! Touch data types

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Maximum number of simultaneous points reported by `read_points`
pub const MAX_TOUCH_POINTS: usize = 5;

/// One touch sample, produced fresh on every poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TouchSample {
    /// A finger is on the panel
    pub touched: bool,
    /// X coordinate (valid only when touched)
    pub x: u16,
    /// Y coordinate (valid only when touched)
    pub y: u16,
    /// Contact size (valid only when touched)
    pub size: u16,
}

impl TouchSample {
    /// Nothing on the panel
    pub const RELEASED: Self = Self {
        touched: false,
        x: 0,
        y: 0,
        size: 0,
    };

    /// A pressed sample at the given point
    pub const fn pressed(x: u16, y: u16, size: u16) -> Self {
        Self {
            touched: true,
            x,
            y,
            size,
        }
    }
}

/// One decoded contact from a multi-point read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TouchPoint {
    /// Controller-assigned track id, stable while the finger stays down
    pub track_id: u8,
    pub x: u16,
    pub y: u16,
    pub size: u16,
}

/// Ordered list of contacts, first-reported first
pub type TouchPoints = Vec<TouchPoint, MAX_TOUCH_POINTS>;

/// Touch controller identification, read once at init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ControllerInfo {
    /// ASCII product id (e.g. `b"911\0"`)
    pub product_id: [u8; 4],
    /// Firmware version
    pub firmware_id: u16,
    /// Native X resolution
    pub x_resolution: u16,
    /// Native Y resolution
    pub y_resolution: u16,
    /// Module vendor id
    pub vendor_id: u8,
    /// Configuration version, if it could be read
    pub config_version: Option<u8>,
    /// True if the identification read failed and defaults were substituted
    pub is_fallback: bool,
}

impl ControllerInfo {
    /// Identification used when the controller could not be read
    pub const fn fallback(x_resolution: u16, y_resolution: u16) -> Self {
        Self {
            product_id: [0; 4],
            firmware_id: 0,
            x_resolution,
            y_resolution,
            vendor_id: 0,
            config_version: None,
            is_fallback: true,
        }
    }

    /// Product id as text, trimmed at the first NUL
    pub fn product_id_str(&self) -> &str {
        let len = self
            .product_id
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.product_id.len());
        core::str::from_utf8(&self.product_id[..len]).unwrap_or("")
    }

    /// Native resolution as (x, y)
    pub fn resolution(&self) -> (u16, u16) {
        (self.x_resolution, self.y_resolution)
    }
}
