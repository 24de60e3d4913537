//! Reference board wiring
//!
//! ST7701 panel at 480×480 RGB565, GT911 touch at 0x5D, backlight on a
//! 500 Hz PWM channel. Pin and clock assignments live in
//! [`lumen_core::config::board`].

use embedded_hal::delay::DelayNs;
use lumen_core::clock::LogicalClock;
use lumen_core::config::PanelGeometry;
use lumen_core::traits::GraphicsEngine;
use lumen_drivers::{Gt911, Gt911Config, PwmBacklight, PwmBacklightConfig, St7701};
use lumen_hal::i2c::I2cHost;
use lumen_hal::memory::FrameMemory;
use lumen_hal::pwm::PwmOutput;
use lumen_hal::rgb::RgbHost;
use lumen_hal::spi::CommandHost;
use lumen_hal::timer::PeriodicTimer;

use crate::port::RenderPort;

/// Port built from the board's drivers
pub type BoardPort<'c, CH, RH, D, IH, PW, E, M, K> =
    RenderPort<'c, St7701<CH, RH, D>, Gt911<IH>, PwmBacklight<PW>, E, M, K>;

/// Assemble the port for the reference board
#[allow(clippy::too_many_arguments)]
pub fn board_port<'c, CH, RH, D, IH, PW, E, M, K>(
    command_host: CH,
    rgb_host: RH,
    delay: D,
    i2c_host: IH,
    pwm: PW,
    engine: E,
    memory: M,
    timer: K,
    clock: &'c LogicalClock,
) -> BoardPort<'c, CH, RH, D, IH, PW, E, M, K>
where
    CH: CommandHost,
    RH: RgbHost,
    D: DelayNs,
    IH: I2cHost,
    PW: PwmOutput,
    E: GraphicsEngine,
    M: FrameMemory,
    K: PeriodicTimer,
{
    RenderPort::new(
        St7701::new(command_host, rgb_host, delay, PanelGeometry::BOARD),
        Gt911::new(i2c_host, Gt911Config::default()),
        PwmBacklight::new(pwm, PwmBacklightConfig::default()),
        engine,
        memory,
        timer,
        clock,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortError;
    use lumen_core::area::Area;
    use lumen_core::traits::{
        Backlight, DisplayPanel, DisplayTargetDesc, InputDeviceKind, PointerEvent, PortCallbacks,
        RenderMode,
    };
    use lumen_hal::i2c::{I2cBus, I2cConfig};
    use lumen_hal::memory::HeapFrameMemory;
    use lumen_hal::pwm::PwmConfig;
    use lumen_hal::rgb::{RgbConfig, RgbPanel};
    use lumen_drivers::{InitStep, St7701Error};
    use lumen_hal::spi::{CommandBus, Mode, ThreeWireConfig};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Fault;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        CmdOpen,
        Cmd(u8),
        CmdClose,
        RgbOpen,
        RgbReset,
        RgbInit,
        Draw(u16, u16, u16, u16, usize),
        RgbClose,
        I2cOpen,
        I2cRead(u16, usize),
        I2cWrite(Vec<u8>),
        I2cClose,
        PwmConfigure,
        PwmCompare(u32),
        PwmStart,
        PwmStop,
        TimerStart(u32),
        TimerStop,
        RegisterDisplay(DisplayTargetDesc),
        UnregisterDisplay,
        RegisterInput(InputDeviceKind),
        UnregisterInput,
        Advance(u32),
        Polled(PointerEvent),
    }

    /// Everything on the board, recording into one log
    #[derive(Default)]
    struct Board {
        log: Vec<Op>,
        touch_regs: HashMap<u16, Vec<u8>>,
        flush: Option<Area>,
        failing_opcode: Option<u8>,
    }

    #[derive(Clone, Default)]
    struct Hw(Rc<RefCell<Board>>);

    impl Hw {
        fn push(&self, op: Op) {
            self.0.borrow_mut().log.push(op);
        }

        fn take_log(&self) -> Vec<Op> {
            core::mem::take(&mut self.0.borrow_mut().log)
        }

        fn set_touch(&self, reg: u16, data: &[u8]) {
            self.0.borrow_mut().touch_regs.insert(reg, data.to_vec());
        }
    }

    impl CommandBus for Hw {
        type Error = Fault;

        fn send(&mut self, opcode: u8, _params: &[u8]) -> Result<(), Fault> {
            self.push(Op::Cmd(opcode));
            if self.0.borrow().failing_opcode == Some(opcode) {
                Err(Fault)
            } else {
                Ok(())
            }
        }
    }

    impl CommandHost for Hw {
        type Bus = Hw;

        fn open(&mut self, config: &ThreeWireConfig) -> Result<Hw, Fault> {
            assert_eq!(config.mode, Mode::Mode0);
            assert!(config.use_dc_bit);
            self.push(Op::CmdOpen);
            Ok(self.clone())
        }

        fn close(&mut self, _bus: Hw) -> Result<(), Fault> {
            self.push(Op::CmdClose);
            Ok(())
        }
    }

    struct Stream(Hw);

    impl RgbPanel for Stream {
        type Error = Fault;

        fn reset(&mut self) -> Result<(), Fault> {
            self.0.push(Op::RgbReset);
            Ok(())
        }

        fn init(&mut self) -> Result<(), Fault> {
            self.0.push(Op::RgbInit);
            Ok(())
        }

        fn draw_bitmap(
            &mut self,
            x0: u16,
            y0: u16,
            x1: u16,
            y1: u16,
            pixels: &[u8],
        ) -> Result<(), Fault> {
            self.0.push(Op::Draw(x0, y0, x1, y1, pixels.len()));
            Ok(())
        }
    }

    struct RgbPeripheral(Hw);

    impl RgbHost for RgbPeripheral {
        type Panel = Stream;

        fn open(&mut self, _config: &RgbConfig) -> Result<Stream, Fault> {
            self.0.push(Op::RgbOpen);
            Ok(Stream(self.0.clone()))
        }

        fn close(&mut self, _panel: Stream) -> Result<(), Fault> {
            self.0.push(Op::RgbClose);
            Ok(())
        }
    }

    struct TouchBus(Hw);

    impl I2cBus for TouchBus {
        type Error = Fault;

        fn write(&mut self, _address: u8, data: &[u8]) -> Result<(), Fault> {
            self.0.push(Op::I2cWrite(data.to_vec()));
            Ok(())
        }

        fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), Fault> {
            Err(Fault)
        }

        fn write_read(&mut self, _address: u8, write: &[u8], buf: &mut [u8]) -> Result<(), Fault> {
            let reg = u16::from_be_bytes([write[0], write[1]]);
            self.0.push(Op::I2cRead(reg, buf.len()));
            let board = self.0 .0.borrow();
            let data = board.touch_regs.get(&reg).ok_or(Fault)?;
            for (dst, src) in buf.iter_mut().zip(data) {
                *dst = *src;
            }
            Ok(())
        }
    }

    struct TouchPort(Hw);

    impl I2cHost for TouchPort {
        type Bus = TouchBus;

        fn open(&mut self, _config: &I2cConfig) -> Result<TouchBus, Fault> {
            self.0.push(Op::I2cOpen);
            Ok(TouchBus(self.0.clone()))
        }

        fn close(&mut self, _bus: TouchBus) -> Result<(), Fault> {
            self.0.push(Op::I2cClose);
            Ok(())
        }
    }

    struct Pwm(Hw);

    impl PwmOutput for Pwm {
        type Error = Fault;

        fn configure(&mut self, _config: &PwmConfig) -> Result<(), Fault> {
            self.0.push(Op::PwmConfigure);
            Ok(())
        }

        fn set_compare(&mut self, ticks: u32) -> Result<(), Fault> {
            self.0.push(Op::PwmCompare(ticks));
            Ok(())
        }

        fn start(&mut self) -> Result<(), Fault> {
            self.0.push(Op::PwmStart);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), Fault> {
            self.0.push(Op::PwmStop);
            Ok(())
        }
    }

    struct Timer(Hw);

    impl PeriodicTimer for Timer {
        type Error = Fault;

        fn start_periodic(&mut self, period_ms: u32) -> Result<(), Fault> {
            self.0.push(Op::TimerStart(period_ms));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), Fault> {
            self.0.push(Op::TimerStop);
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Engine that polls once and flushes the configured area per pass
    struct Engine(Hw);

    impl GraphicsEngine for Engine {
        type Error = Fault;

        fn register_display_target(&mut self, desc: &DisplayTargetDesc) -> Result<(), Fault> {
            self.0.push(Op::RegisterDisplay(*desc));
            Ok(())
        }

        fn unregister_display_target(&mut self) {
            self.0.push(Op::UnregisterDisplay);
        }

        fn register_input_device(&mut self, kind: InputDeviceKind) -> Result<(), Fault> {
            self.0.push(Op::RegisterInput(kind));
            Ok(())
        }

        fn unregister_input_device(&mut self) {
            self.0.push(Op::UnregisterInput);
        }

        fn advance_clock(&mut self, delta_ms: u32) {
            self.0.push(Op::Advance(delta_ms));
        }

        fn run(&mut self, frame: &mut [u8], callbacks: &mut dyn PortCallbacks) -> Result<(), Fault> {
            let event = callbacks.poll();
            self.0.push(Op::Polled(event));

            let flush = self.0 .0.borrow().flush;
            if let Some(area) = flush {
                let len = area.to_blit().map_or(0, |rect| rect.pixel_count() * 2);
                let _ = callbacks.flush(&area, &frame[..len]);
            }
            Ok(())
        }
    }

    type TestPort<'c> =
        BoardPort<'c, Hw, RgbPeripheral, NoDelay, TouchPort, Pwm, Engine, HeapFrameMemory, Timer>;

    fn build<'a>(hw: &Hw, memory: HeapFrameMemory, clock: &'a LogicalClock) -> TestPort<'a> {
        board_port(
            hw.clone(),
            RgbPeripheral(hw.clone()),
            NoDelay,
            TouchPort(hw.clone()),
            Pwm(hw.clone()),
            Engine(hw.clone()),
            memory,
            Timer(hw.clone()),
            clock,
        )
    }

    const STATUS: u16 = 0x814E;
    const POINT_1_X: u16 = 0x8150;

    #[test]
    fn test_board_bring_up() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::new(), &clock);

        // No identification registers: falls back to the panel size
        let info = port.init().unwrap();
        assert!(info.is_fallback);
        assert_eq!(info.resolution(), (480, 480));
        assert!(port.panel().is_ready());

        let log = hw.take_log();
        assert_eq!(
            &log[..4],
            &[Op::TimerStart(10), Op::PwmConfigure, Op::PwmCompare(10_000), Op::PwmStart]
        );
        assert_eq!(log[4], Op::CmdOpen);
        assert_eq!(log[5], Op::Cmd(0x01));

        let stream_at = log.iter().position(|op| *op == Op::RgbOpen).unwrap();
        assert_eq!(&log[stream_at - 2..stream_at], &[Op::Cmd(0x11), Op::Cmd(0x29)]);
        assert_eq!(&log[stream_at + 1..stream_at + 3], &[Op::RgbReset, Op::RgbInit]);

        let register_at = log
            .iter()
            .position(|op| matches!(op, Op::RegisterDisplay(_)))
            .unwrap();
        assert_eq!(
            log[register_at],
            Op::RegisterDisplay(DisplayTargetDesc {
                width: 480,
                height: 480,
                color_format: PanelGeometry::BOARD.color_format,
                render_mode: RenderMode::Full,
                buffer_len: 480 * 480 * 2,
            })
        );
        assert_eq!(log[register_at + 1], Op::I2cOpen);
        assert_eq!(log.last(), Some(&Op::RegisterInput(InputDeviceKind::Pointer)));
    }

    #[test]
    fn test_restart_replays_identical_sequence() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::new(), &clock);

        port.init().unwrap();
        port.shutdown().unwrap();
        let first = hw.take_log();

        port.init().unwrap();
        port.shutdown().unwrap();
        let second = hw.take_log();

        assert_eq!(first, second);
        assert_eq!(
            &first[first.len() - 7..],
            &[
                Op::TimerStop,
                Op::UnregisterInput,
                Op::UnregisterDisplay,
                Op::RgbClose,
                Op::CmdClose,
                Op::I2cClose,
                Op::PwmStop,
            ]
        );
    }

    #[test]
    fn test_frame_alloc_failure_skips_registration() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::with_limit(1024), &clock);

        let err = port.init().unwrap_err();
        assert!(matches!(err, PortError::FrameAlloc { requested: 460_800 }));
        assert!(err.is_fatal());
        assert!(!port.is_running());
        assert!(!port.panel().is_ready());

        let log = hw.take_log();
        assert!(!log.iter().any(|op| matches!(op, Op::RegisterDisplay(_))));
        assert!(!log.contains(&Op::I2cOpen));
        assert!(log.contains(&Op::RgbClose));
        assert_eq!(log.last(), Some(&Op::PwmStop));
    }

    #[test]
    fn test_reset_failure_is_retryable() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::new(), &clock);
        hw.0.borrow_mut().failing_opcode = Some(0x01);

        let err = port.init().unwrap_err();
        assert_eq!(
            err,
            PortError::Panel(St7701Error::Command {
                step: InitStep::SoftwareReset,
                error: Fault,
            })
        );
        assert!(!err.is_fatal());
        assert!(!port.is_running());
        let log = hw.take_log();
        assert!(log.contains(&Op::CmdClose));
        assert_eq!(log.last(), Some(&Op::PwmStop));

        hw.0.borrow_mut().failing_opcode = None;
        assert!(port.init().is_ok());
    }

    #[test]
    fn test_table_failure_is_fatal() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::new(), &clock);
        hw.0.borrow_mut().failing_opcode = Some(0x36);

        let err = port.init().unwrap_err();
        assert!(matches!(
            err,
            PortError::Panel(St7701Error::Command {
                step: InitStep::MemoryAccess,
                ..
            })
        ));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_flush_reaches_stream() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::new(), &clock);
        port.init().unwrap();
        hw.take_log();

        hw.0.borrow_mut().flush = Some(Area::new(10, 10, 19, 19));
        port.pump().unwrap();

        let log = hw.take_log();
        assert_eq!(log.last(), Some(&Op::Draw(10, 10, 20, 20, 200)));
    }

    #[test]
    fn test_poll_reports_press() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::new(), &clock);
        port.init().unwrap();
        hw.take_log();

        hw.set_touch(STATUS, &[0x81]);
        hw.set_touch(POINT_1_X, &[16, 0, 32, 0, 4, 0]);
        clock.tick(10);
        clock.tick(10);
        assert_eq!(port.pump(), Ok(20));

        assert_eq!(
            hw.take_log(),
            vec![
                Op::Advance(20),
                Op::I2cRead(STATUS, 1),
                Op::I2cRead(POINT_1_X, 6),
                Op::I2cWrite(vec![0x81, 0x4E, 0x00]),
                Op::Polled(PointerEvent::pressed(16, 32)),
            ]
        );

        // Finger lifted: release at the last point
        hw.set_touch(STATUS, &[0x80]);
        port.pump().unwrap();
        assert!(hw
            .take_log()
            .contains(&Op::Polled(PointerEvent::released(16, 32))));
    }

    #[test]
    fn test_backlight_level() {
        let hw = Hw::default();
        let clock = LogicalClock::new();
        let mut port = build(&hw, HeapFrameMemory::new(), &clock);
        port.init().unwrap();
        hw.take_log();

        port.set_backlight(0).unwrap();
        port.set_backlight(100).unwrap();
        assert_eq!(hw.take_log(), vec![Op::PwmCompare(1_500), Op::PwmCompare(20_000)]);
        assert_eq!(port.backlight().duty(), 100);
    }
}
