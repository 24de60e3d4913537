//! ST7701 RGB panel driver
//!
//! The ST7701 is configured over a 3-wire command bus and then refreshed
//! continuously over a 16/18/24-line parallel RGB interface. Bring-up runs
//! once per [`DisplayPanel::init`]:
//!
//! 1. Open the command session
//! 2. Software reset, wait 120 ms
//! 3. Select the Command2 register bank
//! 4. MADCTL from the geometry's memory-access flags
//! 5. COLMOD from the geometry's color format
//! 6. Vendor table, in order, honoring each settle delay
//! 7. Sleep-out, wait 120 ms, display-on
//! 8. Open the RGB streaming session from the geometry's timing
//! 9. Reset and initialize the streaming panel
//!
//! A failure after step 2 leaves the panel half configured and is reported
//! as fatal (see [`FatalError::is_fatal`]). Whatever sessions were opened
//! are released before the error is returned.

use embedded_hal::delay::DelayNs;

use lumen_core::area::BlitRect;
use lumen_core::config::{board, ColorFormat, GeometryError, PanelGeometry};
use lumen_core::traits::{DisplayPanel, FatalError};
use lumen_hal::rgb::{RgbConfig, RgbHost, RgbPanel, SyncFlags};
use lumen_hal::spi::{CommandBus, CommandHost, ThreeWireConfig};

use super::init_table::{InitCommand, VENDOR_INIT};

/// ST7701 command opcodes
pub mod cmd {
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Exit sleep mode
    pub const SLPOUT: u8 = 0x11;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Memory data access control
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
    /// Command2 bank select
    pub const CND2BKXSEL: u8 = 0xFF;
}

/// Settle time after software reset
pub const RESET_DELAY_MS: u32 = 120;
/// Settle time after sleep-out
pub const SLEEP_OUT_DELAY_MS: u32 = 120;

/// Bank-select parameters issued right after reset
pub const BANK_SELECT: [u8; 5] = [0x77, 0x01, 0x00, 0x00, 0x00];

/// Pixels per strip when filling the screen
const FILL_STRIP_PX: usize = 240;

/// Bring-up step, used to locate failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    OpenCommandBus,
    SoftwareReset,
    BankSelect,
    MemoryAccess,
    PixelFormat,
    /// Entry of the vendor table
    VendorTable(u16),
    SleepOut,
    DisplayOn,
    OpenStream,
    StreamReset,
    StreamInit,
}

impl InitStep {
    /// Failures after the software reset leave the panel half configured
    pub fn is_fatal(&self) -> bool {
        !matches!(self, InitStep::OpenCommandBus | InitStep::SoftwareReset)
    }
}

/// Panel driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelState {
    #[default]
    Uninitialized,
    Ready,
    /// Bring-up failed; sessions were released
    Faulted,
}

/// Errors that can occur with the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum St7701Error<C, R> {
    /// Geometry is inconsistent; nothing was opened
    Geometry(GeometryError),
    /// `init` called while ready
    AlreadyInitialized,
    /// Panel is not ready for blits
    NotReady,
    /// Command transfer failed during bring-up
    Command { step: InitStep, error: C },
    /// Streaming session failed during bring-up
    Stream { step: InitStep, error: R },
    /// Blit rectangle exceeds the screen
    OutOfBounds(BlitRect),
    /// Pixel buffer does not match the rectangle
    BufferSize { expected: usize, actual: usize },
    /// Operation needs a different color format
    UnsupportedFormat(ColorFormat),
    /// Streaming transfer failed
    Blit(R),
    /// Closing the streaming session failed
    StreamClose(R),
    /// Closing the command session failed
    CommandClose(C),
}

impl<C, R> FatalError for St7701Error<C, R> {
    fn is_fatal(&self) -> bool {
        match self {
            St7701Error::Geometry(_) => true,
            St7701Error::Command { step, .. } | St7701Error::Stream { step, .. } => step.is_fatal(),
            _ => false,
        }
    }
}

impl<C, R> St7701Error<C, R> {
    /// Bring-up step that failed, if any
    pub fn step(&self) -> Option<InitStep> {
        match self {
            St7701Error::Command { step, .. } | St7701Error::Stream { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Command session error for host `H`
pub type CommandError<H> = <<H as CommandHost>::Bus as CommandBus>::Error;
/// Streaming session error for host `R`
pub type StreamError<R> = <<R as RgbHost>::Panel as RgbPanel>::Error;

/// ST7701 panel driver
pub struct St7701<H: CommandHost, R: RgbHost, D: DelayNs> {
    command_host: H,
    rgb_host: R,
    delay: D,
    geometry: PanelGeometry,
    init_table: &'static [InitCommand],
    command: Option<H::Bus>,
    stream: Option<R::Panel>,
    state: PanelState,
}

impl<H, R, D> St7701<H, R, D>
where
    H: CommandHost,
    R: RgbHost,
    D: DelayNs,
{
    /// Create a driver with the vendor bring-up table
    pub fn new(command_host: H, rgb_host: R, delay: D, geometry: PanelGeometry) -> Self {
        Self {
            command_host,
            rgb_host,
            delay,
            geometry,
            init_table: VENDOR_INIT,
            command: None,
            stream: None,
            state: PanelState::Uninitialized,
        }
    }

    /// Replace the vendor bring-up table
    pub fn with_init_table(mut self, table: &'static [InitCommand]) -> Self {
        self.init_table = table;
        self
    }

    /// Current state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Command bus configuration derived from the geometry
    pub fn command_config(&self) -> ThreeWireConfig {
        let pins = &self.geometry.command_pins;
        ThreeWireConfig {
            cs: pins.cs,
            sclk: pins.sclk,
            sda: pins.sda,
            frequency: board::LCD_COMMAND_CLOCK_HZ,
            timeout_ms: board::COMMAND_TIMEOUT_MS,
            ..ThreeWireConfig::default()
        }
    }

    /// RGB streaming configuration derived from the geometry
    pub fn rgb_config(&self) -> RgbConfig {
        let g = &self.geometry;
        let t = &g.timing;
        RgbConfig {
            pclk_hz: t.pclk_hz,
            h_res: g.width,
            v_res: g.height,
            hsync_pulse_width: t.hsync_pulse_width,
            hsync_back_porch: t.hsync_back_porch,
            hsync_front_porch: t.hsync_front_porch,
            vsync_pulse_width: t.vsync_pulse_width,
            vsync_back_porch: t.vsync_back_porch,
            vsync_front_porch: t.vsync_front_porch,
            flags: SyncFlags {
                hsync_idle_low: t.flags.hsync_idle_low,
                vsync_idle_low: t.flags.vsync_idle_low,
                de_idle_high: t.flags.de_idle_high,
                pclk_active_neg: t.flags.pclk_active_neg,
                pclk_idle_high: t.flags.pclk_idle_high,
            },
            data_width: g.rgb_pins.data.len() as u8,
            bytes_per_pixel: g.bytes_per_pixel() as u8,
            hsync: g.rgb_pins.hsync,
            vsync: g.rgb_pins.vsync,
            de: g.rgb_pins.de,
            pclk: g.rgb_pins.pclk,
            data: g.rgb_pins.data,
            fb_in_psram: true,
            timeout_ms: board::STREAM_TIMEOUT_MS,
        }
    }

    /// Fill the whole screen with one RGB565 color
    ///
    /// Streams the frame in short strips so no frame-sized buffer is needed.
    pub fn fill(&mut self, color: u16) -> Result<(), St7701Error<CommandError<H>, StreamError<R>>> {
        if self.geometry.color_format != ColorFormat::Rgb565 {
            return Err(St7701Error::UnsupportedFormat(self.geometry.color_format));
        }
        if self.state != PanelState::Ready {
            return Err(St7701Error::NotReady);
        }
        let stream = self.stream.as_mut().ok_or(St7701Error::NotReady)?;

        let mut strip = [0u8; FILL_STRIP_PX * 2];
        for px in strip.chunks_exact_mut(2) {
            px.copy_from_slice(&color.to_le_bytes());
        }

        let width = self.geometry.width as usize;
        for y in 0..self.geometry.height {
            let mut x0 = 0;
            while x0 < width {
                let x1 = (x0 + FILL_STRIP_PX).min(width);
                stream
                    .draw_bitmap(x0 as u16, y, x1 as u16, y + 1, &strip[..(x1 - x0) * 2])
                    .map_err(St7701Error::Blit)?;
                x0 = x1;
            }
        }
        Ok(())
    }

    fn send(
        bus: &mut H::Bus,
        step: InitStep,
        opcode: u8,
        params: &[u8],
    ) -> Result<(), St7701Error<CommandError<H>, StreamError<R>>> {
        bus.send(opcode, params)
            .map_err(|error| St7701Error::Command { step, error })
    }

    fn bring_up(&mut self) -> Result<(), St7701Error<CommandError<H>, StreamError<R>>> {
        let config = self.command_config();
        let bus = self
            .command_host
            .open(&config)
            .map_err(|error| St7701Error::Command {
                step: InitStep::OpenCommandBus,
                error,
            })?;
        let bus = self.command.insert(bus);

        Self::send(bus, InitStep::SoftwareReset, cmd::SWRESET, &[])?;
        self.delay.delay_ms(RESET_DELAY_MS);

        Self::send(bus, InitStep::BankSelect, cmd::CND2BKXSEL, &BANK_SELECT)?;
        Self::send(
            bus,
            InitStep::MemoryAccess,
            cmd::MADCTL,
            &[self.geometry.memory_access.bits()],
        )?;
        Self::send(
            bus,
            InitStep::PixelFormat,
            cmd::COLMOD,
            &[self.geometry.color_format.colmod()],
        )?;

        for (index, command) in self.init_table.iter().enumerate() {
            Self::send(
                bus,
                InitStep::VendorTable(index as u16),
                command.opcode,
                command.payload,
            )?;
            if command.delay_ms > 0 {
                self.delay.delay_ms(command.delay_ms);
            }
        }
        debug!("ST7701 vendor table sent ({} commands)", self.init_table.len());

        Self::send(bus, InitStep::SleepOut, cmd::SLPOUT, &[])?;
        self.delay.delay_ms(SLEEP_OUT_DELAY_MS);
        Self::send(bus, InitStep::DisplayOn, cmd::DISPON, &[])?;
        info!("ST7701 command bring-up done");

        let config = self.rgb_config();
        let stream = self
            .rgb_host
            .open(&config)
            .map_err(|error| St7701Error::Stream {
                step: InitStep::OpenStream,
                error,
            })?;
        let stream = self.stream.insert(stream);

        stream.reset().map_err(|error| St7701Error::Stream {
            step: InitStep::StreamReset,
            error,
        })?;
        stream.init().map_err(|error| St7701Error::Stream {
            step: InitStep::StreamInit,
            error,
        })?;
        info!(
            "ST7701 RGB stream up: {}x{} @ {} Hz pclk",
            self.geometry.width,
            self.geometry.height,
            self.geometry.timing.pclk_hz
        );
        Ok(())
    }

    /// Close the streaming session, then the command session
    fn release(&mut self) -> Result<(), St7701Error<CommandError<H>, StreamError<R>>> {
        let mut result = Ok(());
        if let Some(stream) = self.stream.take() {
            if let Err(error) = self.rgb_host.close(stream) {
                result = Err(St7701Error::StreamClose(error));
            }
        }
        if let Some(bus) = self.command.take() {
            if let Err(error) = self.command_host.close(bus) {
                if result.is_ok() {
                    result = Err(St7701Error::CommandClose(error));
                }
            }
        }
        result
    }
}

impl<H, R, D> DisplayPanel for St7701<H, R, D>
where
    H: CommandHost,
    R: RgbHost,
    D: DelayNs,
{
    type Error = St7701Error<CommandError<H>, StreamError<R>>;

    fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    fn init(&mut self) -> Result<(), Self::Error> {
        if self.state == PanelState::Ready {
            return Err(St7701Error::AlreadyInitialized);
        }
        self.geometry.validate().map_err(St7701Error::Geometry)?;

        match self.bring_up() {
            Ok(()) => {
                self.state = PanelState::Ready;
                Ok(())
            }
            Err(err) => {
                if err.is_fatal() {
                    error!("ST7701 bring-up failed at {}", err.step());
                } else {
                    warn!("ST7701 bring-up failed at {}", err.step());
                }
                // Sessions are released so a later init starts clean
                let _ = self.release();
                self.state = PanelState::Faulted;
                Err(err)
            }
        }
    }

    fn blit(&mut self, rect: &BlitRect, pixels: &[u8]) -> Result<(), Self::Error> {
        if self.state != PanelState::Ready {
            return Err(St7701Error::NotReady);
        }
        if !rect.fits(self.geometry.width, self.geometry.height) {
            return Err(St7701Error::OutOfBounds(*rect));
        }
        let expected = rect.pixel_count() * self.geometry.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(St7701Error::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        if rect.is_empty() {
            return Ok(());
        }

        let stream = self.stream.as_mut().ok_or(St7701Error::NotReady)?;
        stream
            .draw_bitmap(rect.x0, rect.y0, rect.x1, rect.y1, pixels)
            .map_err(St7701Error::Blit)
    }

    fn shutdown(&mut self) -> Result<(), Self::Error> {
        if self.command.is_none() && self.stream.is_none() {
            return Err(St7701Error::NotReady);
        }
        self.state = PanelState::Uninitialized;
        self.release()
    }

    fn is_ready(&self) -> bool {
        self.state == PanelState::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::init_table::total_delay_ms;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Fault;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        CmdOpen(ThreeWireConfig),
        Cmd(u8, Vec<u8>),
        CmdClose,
        RgbOpen(RgbConfig),
        RgbReset,
        RgbInit,
        Draw(u16, u16, u16, u16, usize),
        RgbClose,
        DelayMs(u32),
    }

    #[derive(Default)]
    struct Hw {
        log: Vec<Op>,
        fail_opcode: Option<u8>,
        fail_stream_init: bool,
        delayed_ns: u64,
    }

    type Shared = Rc<RefCell<Hw>>;

    struct CmdHost(Shared);
    struct CmdBus(Shared);
    struct StreamHost(Shared);
    struct Stream(Shared);
    struct Delay(Shared);

    impl CommandBus for CmdBus {
        type Error = Fault;

        fn send(&mut self, opcode: u8, params: &[u8]) -> Result<(), Fault> {
            let mut hw = self.0.borrow_mut();
            hw.log.push(Op::Cmd(opcode, params.to_vec()));
            if hw.fail_opcode == Some(opcode) {
                Err(Fault)
            } else {
                Ok(())
            }
        }
    }

    impl CommandHost for CmdHost {
        type Bus = CmdBus;

        fn open(&mut self, config: &ThreeWireConfig) -> Result<CmdBus, Fault> {
            self.0.borrow_mut().log.push(Op::CmdOpen(*config));
            Ok(CmdBus(self.0.clone()))
        }

        fn close(&mut self, _bus: CmdBus) -> Result<(), Fault> {
            self.0.borrow_mut().log.push(Op::CmdClose);
            Ok(())
        }
    }

    impl RgbPanel for Stream {
        type Error = Fault;

        fn reset(&mut self) -> Result<(), Fault> {
            self.0.borrow_mut().log.push(Op::RgbReset);
            Ok(())
        }

        fn init(&mut self) -> Result<(), Fault> {
            let mut hw = self.0.borrow_mut();
            hw.log.push(Op::RgbInit);
            if hw.fail_stream_init {
                Err(Fault)
            } else {
                Ok(())
            }
        }

        fn draw_bitmap(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, pixels: &[u8]) -> Result<(), Fault> {
            self.0
                .borrow_mut()
                .log
                .push(Op::Draw(x0, y0, x1, y1, pixels.len()));
            Ok(())
        }
    }

    impl RgbHost for StreamHost {
        type Panel = Stream;

        fn open(&mut self, config: &RgbConfig) -> Result<Stream, Fault> {
            self.0.borrow_mut().log.push(Op::RgbOpen(*config));
            Ok(Stream(self.0.clone()))
        }

        fn close(&mut self, _panel: Stream) -> Result<(), Fault> {
            self.0.borrow_mut().log.push(Op::RgbClose);
            Ok(())
        }
    }

    impl DelayNs for Delay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().delayed_ns += ns as u64;
        }

        fn delay_ms(&mut self, ms: u32) {
            let mut hw = self.0.borrow_mut();
            hw.log.push(Op::DelayMs(ms));
            hw.delayed_ns += ms as u64 * 1_000_000;
        }
    }

    fn panel(geometry: PanelGeometry) -> (Shared, St7701<CmdHost, StreamHost, Delay>) {
        let hw = Shared::default();
        let panel = St7701::new(
            CmdHost(hw.clone()),
            StreamHost(hw.clone()),
            Delay(hw.clone()),
            geometry,
        );
        (hw, panel)
    }

    fn commands(hw: &Shared) -> Vec<(u8, Vec<u8>)> {
        hw.borrow()
            .log
            .iter()
            .filter_map(|op| match op {
                Op::Cmd(opcode, params) => Some((*opcode, params.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bring_up_order() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        panel.init().unwrap();
        assert!(panel.is_ready());

        let cmds = commands(&hw);
        assert_eq!(cmds[0], (cmd::SWRESET, vec![]));
        assert_eq!(cmds[1], (cmd::CND2BKXSEL, BANK_SELECT.to_vec()));
        assert_eq!(cmds[2], (cmd::MADCTL, vec![0x08]));
        assert_eq!(cmds[3], (cmd::COLMOD, vec![0x50]));

        let table: Vec<(u8, Vec<u8>)> = VENDOR_INIT
            .iter()
            .map(|c| (c.opcode, c.payload.to_vec()))
            .collect();
        assert_eq!(&cmds[4..4 + table.len()], &table[..]);

        let tail = &cmds[4 + table.len()..];
        assert_eq!(tail, &[(cmd::SLPOUT, vec![]), (cmd::DISPON, vec![])]);
    }

    #[test]
    fn test_bring_up_session_sequence() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        let command_config = panel.command_config();
        let rgb_config = panel.rgb_config();
        panel.init().unwrap();

        let log = hw.borrow().log.clone();
        assert_eq!(log[0], Op::CmdOpen(command_config));
        assert_eq!(log[1], Op::Cmd(cmd::SWRESET, vec![]));
        assert_eq!(log[2], Op::DelayMs(RESET_DELAY_MS));

        let n = log.len();
        assert_eq!(log[n - 3], Op::RgbOpen(rgb_config));
        assert_eq!(log[n - 2], Op::RgbReset);
        assert_eq!(log[n - 1], Op::RgbInit);

        // Display-on follows the sleep-out settle delay directly
        let dispon = log
            .iter()
            .position(|op| *op == Op::Cmd(cmd::DISPON, vec![]))
            .unwrap();
        assert_eq!(log[dispon - 1], Op::DelayMs(SLEEP_OUT_DELAY_MS));
        assert_eq!(log[dispon + 1], Op::RgbOpen(rgb_config));
    }

    #[test]
    fn test_configs_follow_geometry() {
        let (_hw, panel) = panel(PanelGeometry::BOARD);

        let command = panel.command_config();
        assert_eq!((command.cs, command.sclk, command.sda), (39, 48, 47));
        assert_eq!(command.frequency, 500_000);
        assert!(command.use_dc_bit);

        let rgb = panel.rgb_config();
        assert_eq!((rgb.h_res, rgb.v_res), (480, 480));
        assert_eq!(rgb.pclk_hz, 9_000_000);
        assert_eq!(rgb.data_width, 16);
        assert_eq!(rgb.bytes_per_pixel, 2);
        assert_eq!((rgb.hsync, rgb.vsync, rgb.de, rgb.pclk), (16, 17, 18, 21));
        assert_eq!(rgb.data, &board::PIN_RGB_DATA[..]);
        assert_eq!(rgb.h_total(), 548);
    }

    #[test]
    fn test_delays_cover_declared_settle_times() {
        static TABLE: &[InitCommand] = &[
            InitCommand::with_delay(0xB0, &[0x01], 5),
            InitCommand::new(0xB1, &[0x02]),
            InitCommand::with_delay(0xB2, &[], 20),
        ];
        let (hw, panel) = panel(PanelGeometry::BOARD);
        let mut panel = panel.with_init_table(TABLE);
        panel.init().unwrap();

        let declared = RESET_DELAY_MS + total_delay_ms(TABLE) + SLEEP_OUT_DELAY_MS;
        assert!(hw.borrow().delayed_ns >= declared as u64 * 1_000_000);

        // Each table delay directly follows its command
        let log = hw.borrow().log.clone();
        let b0 = log.iter().position(|op| *op == Op::Cmd(0xB0, vec![0x01])).unwrap();
        assert_eq!(log[b0 + 1], Op::DelayMs(5));
        assert_eq!(log[b0 + 2], Op::Cmd(0xB1, vec![0x02]));
    }

    #[test]
    fn test_invalid_geometry_opens_nothing() {
        let geometry = PanelGeometry {
            color_format: ColorFormat::Rgb888,
            ..PanelGeometry::BOARD
        };
        let (hw, mut panel) = panel(geometry);

        let err = panel.init().unwrap_err();
        assert!(matches!(err, St7701Error::Geometry(_)));
        assert!(err.is_fatal());
        assert!(hw.borrow().log.is_empty());
    }

    #[test]
    fn test_reset_failure_is_not_fatal() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        hw.borrow_mut().fail_opcode = Some(cmd::SWRESET);

        let err = panel.init().unwrap_err();
        assert_eq!(err.step(), Some(InitStep::SoftwareReset));
        assert!(!err.is_fatal());
        assert_eq!(hw.borrow().log.last(), Some(&Op::CmdClose));
    }

    #[test]
    fn test_table_failure_is_fatal_and_releases_bus() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        hw.borrow_mut().fail_opcode = Some(0xE0);

        let err = panel.init().unwrap_err();
        assert_eq!(err.step(), Some(InitStep::VendorTable(17)));
        assert!(err.is_fatal());
        assert_eq!(panel.state(), PanelState::Faulted);
        assert_eq!(hw.borrow().log.last(), Some(&Op::CmdClose));
    }

    #[test]
    fn test_stream_init_failure_releases_both_sessions() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        hw.borrow_mut().fail_stream_init = true;

        let err = panel.init().unwrap_err();
        assert_eq!(err.step(), Some(InitStep::StreamInit));
        assert!(err.is_fatal());

        let log = hw.borrow().log.clone();
        assert_eq!(&log[log.len() - 2..], &[Op::RgbClose, Op::CmdClose]);
        assert!(!panel.is_ready());
    }

    #[test]
    fn test_blit_half_open_rect() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        panel.init().unwrap();
        hw.borrow_mut().log.clear();

        let pixels = [0u8; 10 * 10 * 2];
        panel.blit(&BlitRect::new(10, 10, 20, 20), &pixels).unwrap();
        assert_eq!(hw.borrow().log, vec![Op::Draw(10, 10, 20, 20, 200)]);
    }

    #[test]
    fn test_blit_validation() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        let pixels = [0u8; 8];

        assert_eq!(
            panel.blit(&BlitRect::new(0, 0, 2, 2), &pixels),
            Err(St7701Error::NotReady)
        );

        panel.init().unwrap();
        hw.borrow_mut().log.clear();

        assert_eq!(
            panel.blit(&BlitRect::new(479, 0, 481, 2), &pixels),
            Err(St7701Error::OutOfBounds(BlitRect::new(479, 0, 481, 2)))
        );
        assert_eq!(
            panel.blit(&BlitRect::new(0, 0, 3, 3), &pixels),
            Err(St7701Error::BufferSize {
                expected: 18,
                actual: 8
            })
        );
        assert_eq!(panel.blit(&BlitRect::new(5, 5, 5, 9), &[]), Ok(()));
        assert!(hw.borrow().log.is_empty());
    }

    #[test]
    fn test_fill_streams_every_row() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        panel.init().unwrap();
        hw.borrow_mut().log.clear();

        panel.fill(0xF800).unwrap();
        let log = hw.borrow().log.clone();
        assert_eq!(log.len(), 480 * 2);
        assert_eq!(log[0], Op::Draw(0, 0, 240, 1, 480));
        assert_eq!(log[1], Op::Draw(240, 0, 480, 1, 480));
        assert_eq!(log[log.len() - 1], Op::Draw(240, 479, 480, 480, 480));
    }

    #[test]
    fn test_shutdown_reverse_order() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);
        panel.init().unwrap();
        hw.borrow_mut().log.clear();

        panel.shutdown().unwrap();
        assert_eq!(hw.borrow().log, vec![Op::RgbClose, Op::CmdClose]);
        assert_eq!(panel.state(), PanelState::Uninitialized);
        assert_eq!(panel.shutdown(), Err(St7701Error::NotReady));
    }

    #[test]
    fn test_restart_repeats_bus_sequence() {
        let (hw, mut panel) = panel(PanelGeometry::BOARD);

        panel.init().unwrap();
        panel.shutdown().unwrap();
        let first = std::mem::take(&mut hw.borrow_mut().log);

        panel.init().unwrap();
        panel.shutdown().unwrap();
        assert_eq!(hw.borrow().log, first);
    }

    #[test]
    fn test_double_init_rejected() {
        let (_hw, mut panel) = panel(PanelGeometry::BOARD);
        panel.init().unwrap();
        assert_eq!(panel.init(), Err(St7701Error::AlreadyInitialized));
    }
}
