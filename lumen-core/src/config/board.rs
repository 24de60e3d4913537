//! Reference board constants
//!
//! 480×480 ST7701 RGB panel with a GT911 capacitive touch controller and a
//! PWM-driven backlight.

/// Panel resolution
pub const LCD_H_RES: u16 = 480;
pub const LCD_V_RES: u16 = 480;

/// RGB pixel clock
pub const LCD_PIXEL_CLOCK_HZ: u32 = 9_000_000;

// RGB control lines
pub const PIN_RGB_HSYNC: u8 = 16;
pub const PIN_RGB_VSYNC: u8 = 17;
pub const PIN_RGB_DE: u8 = 18;
pub const PIN_RGB_PCLK: u8 = 21;

/// RGB565 data lines in bus order: R0..R4, G0..G5, B0..B4
pub const PIN_RGB_DATA: [u8; 16] = [11, 12, 13, 14, 0, 8, 20, 3, 46, 9, 10, 4, 5, 6, 7, 15];

// Three-wire command bus
pub const PIN_LCD_CS: u8 = 39;
pub const PIN_LCD_SCLK: u8 = 48;
pub const PIN_LCD_SDA: u8 = 47;
pub const LCD_COMMAND_CLOCK_HZ: u32 = 500_000;

// Touch controller bus
pub const PIN_TOUCH_SDA: u8 = 19;
pub const PIN_TOUCH_SCL: u8 = 45;
pub const TOUCH_I2C_PORT: u8 = 0;
pub const TOUCH_I2C_CLOCK_HZ: u32 = 400_000;
/// GT911 7-bit address with INT held low during reset
pub const TOUCH_I2C_ADDRESS: u8 = 0x5D;

// Backlight
pub const PIN_BACKLIGHT: u8 = 38;
/// PWM timebase, 1 tick = 0.1 µs
pub const BACKLIGHT_RESOLUTION_HZ: u32 = 10_000_000;
/// PWM period in ticks (500 Hz at the timebase above)
pub const BACKLIGHT_PERIOD_TICKS: u32 = 20_000;
/// Lowest compare value ever written, keeps the panel readable
pub const BACKLIGHT_MIN_COMPARE: u32 = 1_500;
/// Duty applied at startup
pub const BACKLIGHT_DEFAULT_PERCENT: u8 = 50;

// Bus transaction bounds
pub const TOUCH_TIMEOUT_MS: u32 = 50;
pub const COMMAND_TIMEOUT_MS: u32 = 50;
pub const STREAM_TIMEOUT_MS: u32 = 100;
