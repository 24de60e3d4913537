//! GT911 capacitive touch controller (I2C)
//!
//! The GT911 exposes a 16-bit, big-endian register map. Touch data is
//! latched in a point buffer that the host must acknowledge by writing 0
//! to the status register after every read; otherwise the controller keeps
//! reporting the stale frame.
//!
//! # Status register (0x814E)
//!
//! - bit 7: buffer ready
//! - bits 3..0: number of pressed points (0-5 in practice, 0-15 encoded)
//!
//! # Point records (0x814F + 8 × n)
//!
//! | offset | field              |
//! |--------|--------------------|
//! | 0      | track id           |
//! | 1..2   | x (little-endian)  |
//! | 3..4   | y (little-endian)  |
//! | 5..6   | size (little-endian) |
//! | 7      | reserved           |

use lumen_core::config::board;
use lumen_core::touch::{ControllerInfo, TouchPoint, TouchPoints, TouchSample, MAX_TOUCH_POINTS};
use lumen_core::traits::TouchController;
use lumen_hal::i2c::{reg16, I2cBus, I2cConfig, I2cHost};

/// GT911 register addresses
pub mod reg {
    /// Command register (sleep, reset)
    pub const COMMAND: u16 = 0x8040;
    /// Configuration version (first byte of the config block)
    pub const CONFIG_VERSION: u16 = 0x8047;
    /// Product id, firmware id, resolution and vendor id
    pub const PRODUCT_ID: u16 = 0x8140;
    /// Buffer status and point count
    pub const STATUS: u16 = 0x814E;
    /// First point record (track id)
    pub const POINT_1: u16 = 0x814F;
    /// First point X coordinate, low byte
    pub const POINT_1_X: u16 = 0x8150;
}

/// Address with INT held low during reset
pub const ADDRESS_PRIMARY: u8 = 0x5D;
/// Address with INT held high during reset
pub const ADDRESS_SECONDARY: u8 = 0x14;

const STATUS_READY: u8 = 0x80;
const STATUS_COUNT_MASK: u8 = 0x0F;

/// Size of the identification record at [`reg::PRODUCT_ID`]
const INFO_LEN: usize = 11;
/// x, y, size of one point
const POINT_PAYLOAD_LEN: usize = 6;
/// Distance between consecutive point records
const POINT_STRIDE: usize = 8;

/// GT911 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gt911Config {
    /// 7-bit device address
    pub address: u8,
    /// Bus configuration used when opening the session
    pub i2c: I2cConfig,
    /// Resolution assumed when identification fails
    pub fallback_width: u16,
    pub fallback_height: u16,
}

impl Default for Gt911Config {
    fn default() -> Self {
        let mut i2c = I2cConfig::new(board::PIN_TOUCH_SDA, board::PIN_TOUCH_SCL, board::TOUCH_I2C_CLOCK_HZ)
            .with_timeout_ms(board::TOUCH_TIMEOUT_MS);
        i2c.port = board::TOUCH_I2C_PORT;
        Self {
            address: board::TOUCH_I2C_ADDRESS,
            i2c,
            fallback_width: board::LCD_H_RES,
            fallback_height: board::LCD_V_RES,
        }
    }
}

/// Errors that can occur with the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gt911Error<E> {
    /// `init` has not been called, or `shutdown` already ran
    NotInitialized,
    /// `init` called twice without `shutdown`
    AlreadyInitialized,
    /// Bus transaction failed (timeout, NACK)
    Bus(E),
}

/// GT911 touch controller driver
///
/// Owns its bus session between [`TouchController::init`] and
/// [`TouchController::shutdown`]; the host that hands out sessions is kept
/// so the driver can be restarted.
pub struct Gt911<H: I2cHost> {
    host: H,
    config: Gt911Config,
    bus: Option<H::Bus>,
    info: Option<ControllerInfo>,
}

/// Bus error of the sessions handed out by `H`
pub type BusError<H> = <<H as I2cHost>::Bus as I2cBus>::Error;

impl<H: I2cHost> Gt911<H> {
    /// Create a driver; no bus traffic until `init`
    pub fn new(host: H, config: Gt911Config) -> Self {
        Self {
            host,
            config,
            bus: None,
            info: None,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Gt911Config {
        &self.config
    }

    /// Identification read at the last `init`
    pub fn info(&self) -> Option<&ControllerInfo> {
        self.info.as_ref()
    }

    /// Give back the session host
    pub fn release(self) -> H {
        self.host
    }

    /// Read all reported points (up to [`MAX_TOUCH_POINTS`])
    ///
    /// Points are decoded from consecutive 8-byte records. The buffer is
    /// acknowledged afterwards exactly like [`TouchController::read_sample`].
    pub fn read_points(&mut self) -> Result<TouchPoints, Gt911Error<BusError<H>>> {
        let address = self.config.address;
        let bus = self.bus.as_mut().ok_or(Gt911Error::NotInitialized)?;
        let mut points = TouchPoints::new();

        let status = read_status(bus, address)?;
        let count = (status & STATUS_COUNT_MASK) as usize;
        if status & STATUS_READY == 0 || count == 0 {
            clear_status(bus, address);
            return Ok(points);
        }

        let count = count.min(MAX_TOUCH_POINTS);
        let mut raw = [0u8; POINT_STRIDE * MAX_TOUCH_POINTS];
        let raw = &mut raw[..count * POINT_STRIDE];
        bus.write_read(address, &reg16(reg::POINT_1), raw)
            .map_err(Gt911Error::Bus)?;
        clear_status(bus, address);

        for record in raw.chunks_exact(POINT_STRIDE) {
            // Capacity equals MAX_TOUCH_POINTS, so push cannot fail
            let _ = points.push(TouchPoint {
                track_id: record[0],
                x: u16::from_le_bytes([record[1], record[2]]),
                y: u16::from_le_bytes([record[3], record[4]]),
                size: u16::from_le_bytes([record[5], record[6]]),
            });
        }
        Ok(points)
    }

    fn identify(bus: &mut H::Bus, address: u8) -> Result<ControllerInfo, BusError<H>> {
        let mut raw = [0u8; INFO_LEN];
        bus.write_read(address, &reg16(reg::PRODUCT_ID), &mut raw)?;

        let mut version = [0u8; 1];
        let config_version = bus
            .write_read(address, &reg16(reg::CONFIG_VERSION), &mut version)
            .ok()
            .map(|_| version[0]);

        Ok(parse_info(&raw, config_version))
    }
}

impl<H: I2cHost> TouchController for Gt911<H> {
    type Error = Gt911Error<BusError<H>>;

    fn init(&mut self) -> Result<ControllerInfo, Self::Error> {
        if self.bus.is_some() {
            return Err(Gt911Error::AlreadyInitialized);
        }

        let mut bus = self.host.open(&self.config.i2c).map_err(Gt911Error::Bus)?;

        let info = match Self::identify(&mut bus, self.config.address) {
            Ok(info) => {
                info!(
                    "GT911 product {=str} fw {=u16:#x} res {}x{} vendor {=u8:#x}",
                    info.product_id_str(),
                    info.firmware_id,
                    info.x_resolution,
                    info.y_resolution,
                    info.vendor_id
                );
                if let Some(version) = info.config_version {
                    debug!("GT911 config version {}", version);
                }
                info
            }
            Err(_) => {
                let info =
                    ControllerInfo::fallback(self.config.fallback_width, self.config.fallback_height);
                warn!(
                    "GT911 identification failed, assuming {}x{}",
                    info.x_resolution,
                    info.y_resolution
                );
                info
            }
        };

        self.bus = Some(bus);
        self.info = Some(info);
        Ok(info)
    }

    fn read_sample(&mut self) -> Result<TouchSample, Self::Error> {
        let address = self.config.address;
        let bus = self.bus.as_mut().ok_or(Gt911Error::NotInitialized)?;

        let status = read_status(bus, address)?;
        if status & STATUS_READY == 0 {
            clear_status(bus, address);
            return Ok(TouchSample::RELEASED);
        }

        let count = status & STATUS_COUNT_MASK;
        if count == 0 {
            clear_status(bus, address);
            return Ok(TouchSample::RELEASED);
        }
        if count > 1 {
            // Only the first record is decoded; use read_points for the rest
            warn!("GT911 multi-touch unsupported, {} points pressed", count);
        }

        let mut payload = [0u8; POINT_PAYLOAD_LEN];
        bus.write_read(address, &reg16(reg::POINT_1_X), &mut payload)
            .map_err(Gt911Error::Bus)?;
        clear_status(bus, address);

        Ok(TouchSample::pressed(
            u16::from_le_bytes([payload[0], payload[1]]),
            u16::from_le_bytes([payload[2], payload[3]]),
            u16::from_le_bytes([payload[4], payload[5]]),
        ))
    }

    fn shutdown(&mut self) -> Result<(), Self::Error> {
        let bus = self.bus.take().ok_or(Gt911Error::NotInitialized)?;
        self.info = None;
        self.host.close(bus).map_err(Gt911Error::Bus)
    }

    fn is_initialized(&self) -> bool {
        self.bus.is_some()
    }
}

fn read_status<B: I2cBus>(bus: &mut B, address: u8) -> Result<u8, Gt911Error<B::Error>> {
    let mut status = [0u8; 1];
    bus.write_read(address, &reg16(reg::STATUS), &mut status)
        .map_err(Gt911Error::Bus)?;
    Ok(status[0])
}

/// Acknowledge the point buffer
///
/// A failed acknowledge is not reported: the next poll reads the status
/// again and acknowledges then.
fn clear_status<B: I2cBus>(bus: &mut B, address: u8) {
    let [hi, lo] = reg16(reg::STATUS);
    if bus.write(address, &[hi, lo, 0x00]).is_err() {
        debug!("GT911 status clear failed");
    }
}

fn parse_info(raw: &[u8; INFO_LEN], config_version: Option<u8>) -> ControllerInfo {
    ControllerInfo {
        product_id: [raw[0], raw[1], raw[2], raw[3]],
        firmware_id: u16::from_le_bytes([raw[4], raw[5]]),
        x_resolution: u16::from_le_bytes([raw[6], raw[7]]),
        y_resolution: u16::from_le_bytes([raw[8], raw[9]]),
        vendor_id: raw[10],
        config_version,
        is_fallback: false,
    }
}
