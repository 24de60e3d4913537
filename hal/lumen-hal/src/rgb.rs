//! Parallel RGB streaming output
//!
//! An RGB ("DPI") panel is refreshed continuously from a frame buffer
//! owned by the peripheral driver. Drawing a bitmap copies a rectangle
//! into that frame buffer; the copy is complete when `draw_bitmap`
//! returns, so two blits to overlapping regions never interleave rows.

/// Streaming panel session
pub trait RgbPanel {
    /// Error type for streaming operations
    type Error;

    /// Reset the panel peripheral
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Initialize the panel peripheral (runs its self-check)
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Copy the half-open rectangle `[x0, x1) × [y0, y1)` from `pixels`
    ///
    /// `pixels` holds exactly `(x1 - x0) * (y1 - y0)` pixels, row-major.
    fn draw_bitmap(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        pixels: &[u8],
    ) -> Result<(), Self::Error>;
}

/// Owner of the RGB peripheral that opens and closes streaming sessions
pub trait RgbHost {
    /// Session handed out by [`RgbHost::open`]
    type Panel: RgbPanel;

    /// Configure the peripheral and open a streaming session
    fn open(&mut self, config: &RgbConfig) -> Result<Self::Panel, <Self::Panel as RgbPanel>::Error>;

    /// Release a session previously returned by [`RgbHost::open`]
    fn close(&mut self, panel: Self::Panel) -> Result<(), <Self::Panel as RgbPanel>::Error>;
}

/// Sync signal polarity flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncFlags {
    /// HSYNC idles low
    pub hsync_idle_low: bool,
    /// VSYNC idles low
    pub vsync_idle_low: bool,
    /// DE idles high
    pub de_idle_high: bool,
    /// Sample data on the falling PCLK edge
    pub pclk_active_neg: bool,
    /// PCLK idles high
    pub pclk_idle_high: bool,
}

/// RGB streaming configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbConfig {
    /// Pixel clock in Hz
    pub pclk_hz: u32,
    /// Horizontal resolution
    pub h_res: u16,
    /// Vertical resolution
    pub v_res: u16,
    /// HSYNC pulse width in PCLK cycles
    pub hsync_pulse_width: u16,
    /// HSYNC back porch in PCLK cycles
    pub hsync_back_porch: u16,
    /// HSYNC front porch in PCLK cycles
    pub hsync_front_porch: u16,
    /// VSYNC pulse width in lines
    pub vsync_pulse_width: u16,
    /// VSYNC back porch in lines
    pub vsync_back_porch: u16,
    /// VSYNC front porch in lines
    pub vsync_front_porch: u16,
    /// Sync polarity flags
    pub flags: SyncFlags,
    /// Number of parallel data lines
    pub data_width: u8,
    /// Bytes per pixel in the streamed buffer
    pub bytes_per_pixel: u8,
    /// HSYNC GPIO number
    pub hsync: u8,
    /// VSYNC GPIO number
    pub vsync: u8,
    /// Data-enable GPIO number
    pub de: u8,
    /// Pixel clock GPIO number
    pub pclk: u8,
    /// Data GPIO numbers, LSB first (`data_width` entries)
    pub data: &'static [u8],
    /// Place the peripheral frame buffer in external RAM
    pub fb_in_psram: bool,
    /// Upper bound for a single bitmap copy in milliseconds
    pub timeout_ms: u32,
}

impl RgbConfig {
    /// Total horizontal period in PCLK cycles
    pub fn h_total(&self) -> u32 {
        self.h_res as u32
            + self.hsync_pulse_width as u32
            + self.hsync_back_porch as u32
            + self.hsync_front_porch as u32
    }

    /// Total vertical period in lines
    pub fn v_total(&self) -> u32 {
        self.v_res as u32
            + self.vsync_pulse_width as u32
            + self.vsync_back_porch as u32
            + self.vsync_front_porch as u32
    }

    /// Resulting refresh rate in millihertz
    pub fn refresh_mhz(&self) -> u32 {
        let frame = self.h_total() as u64 * self.v_total() as u64;
        if frame == 0 {
            return 0;
        }
        (self.pclk_hz as u64 * 1000 / frame) as u32
    }
}
