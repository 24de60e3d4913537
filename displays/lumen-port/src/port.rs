//! Render port lifecycle
//!
//! Init order:
//!
//! 1. Start the tick source
//! 2. Backlight on at its default duty
//! 3. Panel bring-up
//! 4. Allocate the frame buffer
//! 5. Register the display target (full render mode)
//! 6. Touch controller init
//! 7. Register the pointer input device
//!
//! Shutdown runs in reverse: stop the tick source, unregister input and
//! display, release the frame buffer, shut down panel, touch and backlight.
//! A failed init unwinds whatever already started, so the port can be
//! initialized again.

use lumen_core::clock::{LogicalClock, TICK_INTERVAL_MS};
use lumen_core::touch::ControllerInfo;
use lumen_core::traits::{
    Backlight, DisplayPanel, DisplayTargetDesc, FatalError, GraphicsEngine, InputDeviceKind,
    RenderMode, TouchController,
};
use lumen_hal::memory::FrameMemory;
use lumen_hal::timer::PeriodicTimer;

use crate::framebuffer::FrameBuffer;
use crate::hooks::{PointerTracker, PortHooks};

/// Errors that can occur in the port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError<P, T, B, E, K> {
    /// `init` called while running
    AlreadyRunning,
    /// Operation needs a running port
    NotRunning,
    /// Tick source failed
    Timer(K),
    /// Backlight failed
    Backlight(B),
    /// Panel bring-up or shutdown failed
    Panel(P),
    /// Frame memory could not supply the buffer
    FrameAlloc { requested: usize },
    /// Graphics engine refused a registration or failed a pass
    Engine(E),
    /// Touch controller init or shutdown failed
    Touch(T),
}

impl<P: FatalError, T, B, E, K> PortError<P, T, B, E, K> {
    /// Check if the system cannot run after this error
    ///
    /// Panel errors defer to the panel: a failed reset can be retried, a
    /// half-configured panel cannot. The port never aborts by itself; the
    /// caller decides what to do with a fatal error.
    pub fn is_fatal(&self) -> bool {
        match self {
            PortError::AlreadyRunning | PortError::NotRunning | PortError::Backlight(_) => false,
            PortError::Panel(err) => err.is_fatal(),
            PortError::Timer(_)
            | PortError::FrameAlloc { .. }
            | PortError::Engine(_)
            | PortError::Touch(_) => true,
        }
    }
}

/// Error type of a port built from these components
pub type ErrorOf<P, T, B, E, K> = PortError<
    <P as DisplayPanel>::Error,
    <T as TouchController>::Error,
    <B as Backlight>::Error,
    <E as GraphicsEngine>::Error,
    <K as PeriodicTimer>::Error,
>;

/// What has been started and must be undone
#[derive(Debug, Clone, Copy, Default)]
struct Started {
    timer: bool,
    backlight: bool,
    panel: bool,
    display_target: bool,
    touch: bool,
    input: bool,
}

/// Composition root binding panel, touch and backlight to the engine
pub struct RenderPort<'c, P, T, B, E, M, K>
where
    P: DisplayPanel,
    T: TouchController,
    B: Backlight,
    E: GraphicsEngine,
    M: FrameMemory,
    K: PeriodicTimer,
{
    panel: P,
    touch: T,
    backlight: B,
    engine: E,
    memory: M,
    timer: K,
    clock: &'c LogicalClock,
    frame: Option<FrameBuffer<M::Buffer>>,
    pointer: PointerTracker,
    started: Started,
    running: bool,
}

impl<'c, P, T, B, E, M, K> RenderPort<'c, P, T, B, E, M, K>
where
    P: DisplayPanel,
    T: TouchController,
    B: Backlight,
    E: GraphicsEngine,
    M: FrameMemory,
    K: PeriodicTimer,
{
    /// Assemble a port; nothing is started until `init`
    ///
    /// The timer's interrupt handler must call `clock.tick(TICK_INTERVAL_MS)`.
    pub fn new(
        panel: P,
        touch: T,
        backlight: B,
        engine: E,
        memory: M,
        timer: K,
        clock: &'c LogicalClock,
    ) -> Self {
        Self {
            panel,
            touch,
            backlight,
            engine,
            memory,
            timer,
            clock,
            frame: None,
            pointer: PointerTracker::default(),
            started: Started::default(),
            running: false,
        }
    }

    /// Bring everything up
    ///
    /// Returns the touch controller identification (or its fallback).
    pub fn init(&mut self) -> Result<ControllerInfo, ErrorOf<P, T, B, E, K>> {
        if self.running {
            return Err(PortError::AlreadyRunning);
        }
        self.clock.reset();
        self.pointer = PointerTracker::default();

        match self.start() {
            Ok(info) => {
                self.running = true;
                info!("Render port running");
                Ok(info)
            }
            Err(err) => {
                error!("Render port init failed (fatal: {})", err.is_fatal());
                let _ = self.teardown();
                Err(err)
            }
        }
    }

    /// Stop everything, in reverse order of `init`
    ///
    /// Every step is attempted; the first failure is returned.
    pub fn shutdown(&mut self) -> Result<(), ErrorOf<P, T, B, E, K>> {
        if !self.running {
            return Err(PortError::NotRunning);
        }
        let result = self.teardown();
        info!("Render port stopped");
        result
    }

    /// One main-pump pass
    ///
    /// Forwards the time ticked since the previous pass to the engine, then
    /// runs the engine's scheduler with this port's callbacks. Returns the
    /// milliseconds forwarded.
    pub fn pump(&mut self) -> Result<u32, ErrorOf<P, T, B, E, K>> {
        if !self.running {
            return Err(PortError::NotRunning);
        }
        let frame = self.frame.as_mut().ok_or(PortError::NotRunning)?;

        let delta = self.clock.take_pending();
        if delta > 0 {
            self.engine.advance_clock(delta);
        }

        let mut hooks = PortHooks::new(&mut self.panel, &mut self.touch, &mut self.pointer);
        self.engine
            .run(frame.as_mut_slice(), &mut hooks)
            .map_err(PortError::Engine)?;
        Ok(delta)
    }

    /// Set backlight duty in percent
    pub fn set_backlight(&mut self, percent: u8) -> Result<(), ErrorOf<P, T, B, E, K>> {
        if !self.running {
            return Err(PortError::NotRunning);
        }
        self.backlight
            .set_duty(percent)
            .map_err(PortError::Backlight)
    }

    /// Check if `init` completed and `shutdown` has not run
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn clock(&self) -> &'c LogicalClock {
        self.clock
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn touch(&self) -> &T {
        &self.touch
    }

    pub fn backlight(&self) -> &B {
        &self.backlight
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Last pointer position seen by the poll callback
    pub fn last_pointer(&self) -> (u16, u16) {
        self.pointer.last()
    }

    /// The frame buffer, while running
    pub fn frame(&self) -> Option<&[u8]> {
        self.frame.as_ref().map(|frame| frame.as_slice())
    }

    fn start(&mut self) -> Result<ControllerInfo, ErrorOf<P, T, B, E, K>> {
        self.timer
            .start_periodic(TICK_INTERVAL_MS)
            .map_err(PortError::Timer)?;
        self.started.timer = true;

        self.backlight.init().map_err(PortError::Backlight)?;
        self.started.backlight = true;

        self.panel.init().map_err(PortError::Panel)?;
        self.started.panel = true;

        let geometry = *self.panel.geometry();
        let frame = FrameBuffer::allocate(&mut self.memory, &geometry).map_err(|err| {
            error!("Frame buffer allocation of {} bytes failed", err.requested);
            PortError::FrameAlloc {
                requested: err.requested,
            }
        })?;
        let desc = DisplayTargetDesc {
            width: geometry.width,
            height: geometry.height,
            color_format: geometry.color_format,
            render_mode: RenderMode::Full,
            buffer_len: frame.len(),
        };
        self.frame = Some(frame);

        self.engine
            .register_display_target(&desc)
            .map_err(PortError::Engine)?;
        self.started.display_target = true;

        let info = self.touch.init().map_err(PortError::Touch)?;
        self.started.touch = true;

        self.engine
            .register_input_device(InputDeviceKind::Pointer)
            .map_err(PortError::Engine)?;
        self.started.input = true;

        Ok(info)
    }

    fn teardown(&mut self) -> Result<(), ErrorOf<P, T, B, E, K>> {
        let mut first = None;
        let started = core::mem::take(&mut self.started);
        self.running = false;

        if started.timer {
            if let Err(err) = self.timer.stop() {
                first.get_or_insert(PortError::Timer(err));
            }
        }
        if started.input {
            self.engine.unregister_input_device();
        }
        if started.display_target {
            self.engine.unregister_display_target();
        }
        if let Some(frame) = self.frame.take() {
            frame.release(&mut self.memory);
        }
        if started.panel {
            if let Err(err) = self.panel.shutdown() {
                first.get_or_insert(PortError::Panel(err));
            }
        }
        if started.touch {
            if let Err(err) = self.touch.shutdown() {
                first.get_or_insert(PortError::Touch(err));
            }
        }
        if started.backlight {
            if let Err(err) = self.backlight.shutdown() {
                first.get_or_insert(PortError::Backlight(err));
            }
        }

        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
