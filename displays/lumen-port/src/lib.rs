//! Render/input port for the Lumen touch panel stack
//!
//! The port is the composition root: it owns the panel, touch and
//! backlight drivers, the frame buffer and the periodic tick source, and
//! implements the flush/poll callbacks a retained-mode graphics engine
//! calls during its scheduler pass.
//!
//! # Time
//!
//! Two time sources run independently:
//!
//! - the tick source (every [`TICK_INTERVAL_MS`]) only adds to a
//!   [`LogicalClock`]
//! - the main pump (every [`PUMP_INTERVAL_MS`]) calls [`RenderPort::pump`],
//!   which forwards the accumulated time to the engine and runs one
//!   engine pass; all bus I/O happens here
//!
//! ```ignore
//! static CLOCK: LogicalClock = LogicalClock::new();
//!
//! // Timer interrupt
//! CLOCK.tick(TICK_INTERVAL_MS);
//!
//! // Main loop
//! let mut port = board_port(cmd_host, rgb_host, delay, i2c_host, pwm, engine, memory, timer, &CLOCK);
//! port.init()?;
//! loop {
//!     delay.delay_ms(PUMP_INTERVAL_MS);
//!     port.pump()?;
//! }
//! ```
//!
//! [`LogicalClock`]: lumen_core::LogicalClock
//! [`TICK_INTERVAL_MS`]: lumen_core::clock::TICK_INTERVAL_MS
//! [`PUMP_INTERVAL_MS`]: lumen_core::clock::PUMP_INTERVAL_MS

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod board;
pub mod framebuffer;
pub mod hooks;
pub mod port;
#[cfg(feature = "embassy")]
pub mod runner;

pub use board::{board_port, BoardPort};
pub use framebuffer::{AllocError, FrameBuffer};
pub use hooks::{PointerTracker, PortHooks};
pub use port::{ErrorOf, PortError, RenderPort};
