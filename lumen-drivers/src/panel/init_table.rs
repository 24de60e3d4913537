//! ST7701 vendor bring-up table
//!
//! Register values come from the panel vendor. The table is sent verbatim
//! and in order; entries are never merged or reordered. Sleep-out and
//! display-on are not part of it, the driver sends them afterwards.

/// One bring-up command: opcode, parameters, settle delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitCommand {
    /// Command opcode
    pub opcode: u8,
    /// Parameter bytes (may be empty)
    pub payload: &'static [u8],
    /// Time to wait after sending, in milliseconds
    pub delay_ms: u32,
}

impl InitCommand {
    /// Command without settle delay
    pub const fn new(opcode: u8, payload: &'static [u8]) -> Self {
        Self {
            opcode,
            payload,
            delay_ms: 0,
        }
    }

    /// Command followed by a settle delay
    pub const fn with_delay(opcode: u8, payload: &'static [u8], delay_ms: u32) -> Self {
        Self {
            opcode,
            payload,
            delay_ms,
        }
    }
}

/// Sum of all settle delays in `table`
pub fn total_delay_ms(table: &[InitCommand]) -> u32 {
    table.iter().map(|cmd| cmd.delay_ms).sum()
}

/// Command2 bank select (CND2BKxSEL)
const BKSEL: u8 = 0xFF;

/// Vendor table for the reference 480×480 panel
#[rustfmt::skip]
pub static VENDOR_INIT: &[InitCommand] = &[
    // Bank 0: display line, porch, inversion
    InitCommand::new(BKSEL, &[0x77, 0x01, 0x00, 0x00, 0x10]),
    InitCommand::new(0xC0, &[0x3B, 0x00]),
    InitCommand::new(0xC1, &[0x0D, 0x02]),
    InitCommand::new(0xC2, &[0x31, 0x05]),
    InitCommand::new(0xCD, &[0x00]),
    // Positive gamma
    InitCommand::new(0xB0, &[0x00, 0x11, 0x18, 0x0E, 0x11, 0x06, 0x07, 0x08, 0x07, 0x22, 0x04, 0x12, 0x0F, 0xAA, 0x31, 0x18]),
    // Negative gamma
    InitCommand::new(0xB1, &[0x00, 0x11, 0x19, 0x0E, 0x12, 0x07, 0x08, 0x08, 0x08, 0x22, 0x04, 0x11, 0x11, 0xA9, 0x32, 0x18]),
    // Bank 1: power
    InitCommand::new(BKSEL, &[0x77, 0x01, 0x00, 0x00, 0x11]),
    InitCommand::new(0xB0, &[0x60]), // Vop 4.7375 V
    InitCommand::new(0xB1, &[0x32]), // VCOM
    InitCommand::new(0xB2, &[0x07]), // VGH 15 V
    InitCommand::new(0xB3, &[0x80]),
    InitCommand::new(0xB5, &[0x49]), // VGL -10.17 V
    InitCommand::new(0xB7, &[0x85]),
    InitCommand::new(0xB8, &[0x21]), // AVDD 6.6 V, AVCL -4.6 V
    InitCommand::new(0xC1, &[0x78]),
    InitCommand::new(0xC2, &[0x78]),
    // GIP timing
    InitCommand::new(0xE0, &[0x00, 0x1B, 0x02]),
    InitCommand::new(0xE1, &[0x08, 0xA0, 0x00, 0x00, 0x07, 0xA0, 0x00, 0x00, 0x00, 0x44, 0x44]),
    InitCommand::new(0xE2, &[0x11, 0x11, 0x44, 0x44, 0xED, 0xA0, 0x00, 0x00, 0xEC, 0xA0, 0x00, 0x00]),
    InitCommand::new(0xE3, &[0x00, 0x00, 0x11, 0x11]),
    InitCommand::new(0xE4, &[0x44, 0x44]),
    InitCommand::new(0xE5, &[0x0A, 0xE9, 0xD8, 0xA0, 0x0C, 0xEB, 0xD8, 0xA0, 0x0E, 0xED, 0xD8, 0xA0, 0x10, 0xEF, 0xD8, 0xA0]),
    InitCommand::new(0xE6, &[0x00, 0x00, 0x11, 0x11]),
    InitCommand::new(0xE7, &[0x44, 0x44]),
    InitCommand::new(0xE8, &[0x09, 0xE8, 0xD8, 0xA0, 0x0B, 0xEA, 0xD8, 0xA0, 0x0D, 0xEC, 0xD8, 0xA0, 0x0F, 0xEE, 0xD8, 0xA0]),
    InitCommand::new(0xEB, &[0x02, 0x00, 0xE4, 0xE4, 0x88, 0x00, 0x40]),
    InitCommand::new(0xEC, &[0x3C, 0x00]),
    InitCommand::new(0xED, &[0xAB, 0x89, 0x76, 0x54, 0x02, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x20, 0x45, 0x67, 0x98, 0xBA]),
    // Bank 3: VAP/VAN
    InitCommand::new(BKSEL, &[0x77, 0x01, 0x00, 0x00, 0x13]),
    InitCommand::new(0xE5, &[0xE4]),
    // Back to the user command set
    InitCommand::new(BKSEL, &[0x77, 0x01, 0x00, 0x00, 0x00]),
    // COLMOD as tuned by the vendor (0x50 RGB565, 0x60 RGB666, 0x70 RGB888)
    InitCommand::new(0x3A, &[0x60]),
];
