//! Screen rectangles
//!
//! The graphics engine reports dirty regions with inclusive corners
//! (`x2`/`y2` are the last pixel). Panel blits take half-open rectangles.
//! Keeping the two as separate types makes the `+1` conversion explicit.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Inclusive engine rectangle `[x1, x2] × [y1, y2]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Area {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Area {
    /// Create an inclusive area
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The whole screen for the given resolution
    pub const fn full(width: u16, height: u16) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: width.saturating_sub(1),
            y2: height.saturating_sub(1),
        }
    }

    /// Convert to the half-open form `[x1, x2 + 1) × [y1, y2 + 1)`
    ///
    /// Returns `None` if the corners are swapped or `x2`/`y2` is `u16::MAX`.
    pub fn to_blit(&self) -> Option<BlitRect> {
        if self.x2 < self.x1 || self.y2 < self.y1 {
            return None;
        }
        Some(BlitRect {
            x0: self.x1,
            y0: self.y1,
            x1: self.x2.checked_add(1)?,
            y1: self.y2.checked_add(1)?,
        })
    }
}

/// Half-open blit rectangle `[x0, x1) × [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BlitRect {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl BlitRect {
    /// Create a half-open rectangle
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.y1.saturating_sub(self.y0)
    }

    /// Number of pixels covered
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// True if no pixel is covered
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// True if the rectangle lies within a `width × height` screen
    pub fn fits(&self, width: u16, height: u16) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1 && self.x1 <= width && self.y1 <= height
    }
}
