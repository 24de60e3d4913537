//! Panel geometry
//!
//! [`PanelGeometry`] is shared read-only by the panel driver (to configure
//! the RGB peripheral) and the port (to size the frame buffer), so both
//! always agree on resolution and pixel depth.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::board;

/// Pixel format on the parallel bus and in the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ColorFormat {
    /// 16 bits per pixel, 5-6-5
    #[default]
    Rgb565,
    /// 18 bits per pixel on the bus, 3 bytes in memory
    Rgb666,
    /// 24 bits per pixel
    Rgb888,
}

impl ColorFormat {
    /// Bytes per pixel in the frame buffer
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorFormat::Rgb565 => 2,
            ColorFormat::Rgb666 | ColorFormat::Rgb888 => 3,
        }
    }

    /// Number of parallel data lines the format needs
    pub const fn data_lines(self) -> usize {
        match self {
            ColorFormat::Rgb565 => 16,
            ColorFormat::Rgb666 => 18,
            ColorFormat::Rgb888 => 24,
        }
    }

    /// COLMOD (0x3A) parameter for the RGB interface
    pub const fn colmod(self) -> u8 {
        match self {
            ColorFormat::Rgb565 => 0x50,
            ColorFormat::Rgb666 => 0x60,
            ColorFormat::Rgb888 => 0x70,
        }
    }
}

/// MADCTL (0x36) orientation and mirroring flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MemoryAccess(pub u8);

impl MemoryAccess {
    /// Row address order, bottom to top
    pub const MY: u8 = 1 << 7;
    /// Column address order, right to left
    pub const MX: u8 = 1 << 6;
    /// Row/column exchange
    pub const MV: u8 = 1 << 5;
    /// Line refresh order, bottom to top
    pub const ML: u8 = 1 << 4;
    /// BGR subpixel order
    pub const BGR: u8 = 1 << 3;
    /// Data latch order, right to left
    pub const MH: u8 = 1 << 2;

    /// Build from raw flag bits
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw MADCTL parameter
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `flag` is set
    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }
}

/// Sync signal polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SyncFlags {
    pub hsync_idle_low: bool,
    pub vsync_idle_low: bool,
    pub de_idle_high: bool,
    pub pclk_active_neg: bool,
    pub pclk_idle_high: bool,
}

/// RGB interface timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PanelTiming {
    /// Pixel clock in Hz
    pub pclk_hz: u32,
    pub hsync_pulse_width: u16,
    pub hsync_back_porch: u16,
    pub hsync_front_porch: u16,
    pub vsync_pulse_width: u16,
    pub vsync_back_porch: u16,
    pub vsync_front_porch: u16,
    pub flags: SyncFlags,
}

/// Parallel RGB pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RgbPins {
    pub hsync: u8,
    pub vsync: u8,
    pub de: u8,
    pub pclk: u8,
    /// Data lines, LSB first
    pub data: &'static [u8],
}

/// Three-wire command bus pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CommandPins {
    pub cs: u8,
    pub sclk: u8,
    pub sda: u8,
}

/// Geometry validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Width or height is zero
    ZeroSize,
    /// Pixel clock is zero
    ZeroPixelClock,
    /// Data pin count does not match the color format
    DataLineMismatch { expected: usize, actual: usize },
}

/// Immutable panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PanelGeometry {
    pub width: u16,
    pub height: u16,
    pub color_format: ColorFormat,
    pub memory_access: MemoryAccess,
    pub timing: PanelTiming,
    pub rgb_pins: RgbPins,
    pub command_pins: CommandPins,
}

impl PanelGeometry {
    /// Reference board: 480×480 RGB565, BGR order
    pub const BOARD: Self = Self {
        width: board::LCD_H_RES,
        height: board::LCD_V_RES,
        color_format: ColorFormat::Rgb565,
        memory_access: MemoryAccess(MemoryAccess::BGR),
        timing: PanelTiming {
            pclk_hz: board::LCD_PIXEL_CLOCK_HZ,
            hsync_pulse_width: 8,
            hsync_back_porch: 50,
            hsync_front_porch: 10,
            vsync_pulse_width: 8,
            vsync_back_porch: 20,
            vsync_front_porch: 10,
            flags: SyncFlags {
                hsync_idle_low: false,
                vsync_idle_low: false,
                de_idle_high: false,
                pclk_active_neg: false,
                pclk_idle_high: false,
            },
        },
        rgb_pins: RgbPins {
            hsync: board::PIN_RGB_HSYNC,
            vsync: board::PIN_RGB_VSYNC,
            de: board::PIN_RGB_DE,
            pclk: board::PIN_RGB_PCLK,
            data: &board::PIN_RGB_DATA,
        },
        command_pins: CommandPins {
            cs: board::PIN_LCD_CS,
            sclk: board::PIN_LCD_SCLK,
            sda: board::PIN_LCD_SDA,
        },
    };

    /// Bytes per pixel of the configured format
    pub const fn bytes_per_pixel(&self) -> usize {
        self.color_format.bytes_per_pixel()
    }

    /// Number of pixels in one frame
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of one full frame buffer in bytes
    pub const fn frame_len(&self) -> usize {
        self.pixel_count() * self.bytes_per_pixel()
    }

    /// Size of one row in bytes
    pub const fn row_len(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Check internal consistency before any bus is opened
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::ZeroSize);
        }
        if self.timing.pclk_hz == 0 {
            return Err(GeometryError::ZeroPixelClock);
        }
        let expected = self.color_format.data_lines();
        let actual = self.rgb_pins.data.len();
        if expected != actual {
            return Err(GeometryError::DataLineMismatch { expected, actual });
        }
        Ok(())
    }
}
