//! Three-wire SPI command bus abstractions
//!
//! Panel controllers such as the ST7701 take their configuration over a
//! narrow 3-wire bus (clock, data, chip-select) where each 9-bit word
//! carries a D/C flag. Implementations usually bit-bang this or use a
//! vendor "panel IO" peripheral; the driver only needs opcode + payload.

/// Panel command bus session
pub trait CommandBus {
    /// Error type for command transfers
    type Error;

    /// Send one command opcode followed by its parameter bytes
    ///
    /// `params` may be empty. Must return within the session timeout.
    fn send(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error>;
}

/// Owner of the command bus lines that opens and closes sessions
pub trait CommandHost {
    /// Session handed out by [`CommandHost::open`]
    type Bus: CommandBus;

    /// Claim the lines and open a command session
    fn open(
        &mut self,
        config: &ThreeWireConfig,
    ) -> Result<Self::Bus, <Self::Bus as CommandBus>::Error>;

    /// Release a session previously returned by [`CommandHost::open`]
    fn close(&mut self, bus: Self::Bus) -> Result<(), <Self::Bus as CommandBus>::Error>;
}

/// Three-wire command bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThreeWireConfig {
    /// Chip-select GPIO number
    pub cs: u8,
    /// Clock GPIO number
    pub sclk: u8,
    /// Data GPIO number
    pub sda: u8,
    /// Expected clock frequency in Hz (upper bound)
    pub frequency: u32,
    /// SPI mode
    pub mode: Mode,
    /// Command opcode width in bytes
    pub cmd_bytes: u8,
    /// Parameter width in bytes
    pub param_bytes: u8,
    /// Prefix each word with a D/C bit
    pub use_dc_bit: bool,
    /// Upper bound for a single command in milliseconds
    pub timeout_ms: u32,
}

impl Default for ThreeWireConfig {
    fn default() -> Self {
        Self {
            cs: 0,
            sclk: 0,
            sda: 0,
            frequency: 500_000,
            mode: Mode::Mode0,
            cmd_bytes: 1,
            param_bytes: 1,
            use_dc_bit: true,
            timeout_ms: 50,
        }
    }
}

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}
