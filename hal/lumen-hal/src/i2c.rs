//! I2C bus abstractions
//!
//! Provides traits for I2C master operations that can be implemented
//! by chip-specific HALs.

/// I2C bus master session
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices. Every call must return within the session's
/// configured timeout.
pub trait I2cBus {
    /// Error type for I2C operations (timeout, NACK, arbitration loss)
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Owner of an I2C controller that opens and closes bus sessions
pub trait I2cHost {
    /// Session handed out by [`I2cHost::open`]
    type Bus: I2cBus;

    /// Configure the controller and open a session
    fn open(&mut self, config: &I2cConfig) -> Result<Self::Bus, <Self::Bus as I2cBus>::Error>;

    /// Release a session previously returned by [`I2cHost::open`]
    fn close(&mut self, bus: Self::Bus) -> Result<(), <Self::Bus as I2cBus>::Error>;
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Controller index
    pub port: u8,
    /// SDA GPIO number
    pub sda: u8,
    /// SCL GPIO number
    pub scl: u8,
    /// Enable internal pull-ups on SDA/SCL
    pub pull_ups: bool,
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Upper bound for a single transaction in milliseconds
    pub timeout_ms: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            port: 0,
            sda: 0,
            scl: 0,
            pull_ups: true,
            frequency: 100_000, // 100kHz standard mode
            timeout_ms: 50,
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: u32 = 100_000;

    /// Fast mode (400 kHz)
    pub const FAST: u32 = 400_000;

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: u32 = 1_000_000;

    /// Config on the given pins at the given clock
    pub const fn new(sda: u8, scl: u8, frequency: u32) -> Self {
        Self {
            port: 0,
            sda,
            scl,
            pull_ups: true,
            frequency,
            timeout_ms: 50,
        }
    }

    /// Override the transaction timeout
    pub const fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Build the two-byte big-endian register prefix used by 16-bit
/// register-addressed devices
pub const fn reg16(reg: u16) -> [u8; 2] {
    reg.to_be_bytes()
}
