//! Clock and pump loops on embassy-time
//!
//! For firmware running an embassy executor in place of a hardware timer
//! interrupt. Spawn each loop from a task:
//!
//! ```ignore
//! #[embassy_executor::task]
//! async fn clock_task() {
//!     lumen_port::runner::run_clock(&CLOCK).await
//! }
//! ```

use embassy_time::{Duration, Ticker};
use lumen_core::clock::{LogicalClock, PUMP_INTERVAL_MS, TICK_INTERVAL_MS};
use lumen_core::traits::{Backlight, DisplayPanel, GraphicsEngine, TouchController};
use lumen_hal::memory::FrameMemory;
use lumen_hal::timer::PeriodicTimer;

use crate::port::{ErrorOf, RenderPort};

/// Add [`TICK_INTERVAL_MS`] to `clock` every tick, forever
pub async fn run_clock(clock: &LogicalClock) {
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));
    loop {
        ticker.next().await;
        clock.tick(TICK_INTERVAL_MS);
    }
}

/// Pump a running port every [`PUMP_INTERVAL_MS`]
///
/// Returns the first fatal error; non-fatal errors are logged and the loop
/// continues.
pub async fn run_pump<P, T, B, E, M, K>(
    port: &mut RenderPort<'_, P, T, B, E, M, K>,
) -> ErrorOf<P, T, B, E, K>
where
    P: DisplayPanel,
    T: TouchController,
    B: Backlight,
    E: GraphicsEngine,
    M: FrameMemory,
    K: PeriodicTimer,
{
    info!("Pump started");
    let mut ticker = Ticker::every(Duration::from_millis(PUMP_INTERVAL_MS as u64));
    loop {
        ticker.next().await;
        match port.pump() {
            Ok(_) => {}
            Err(err) if err.is_fatal() => {
                error!("Pump stopped on fatal error");
                return err;
            }
            Err(_) => warn!("Pump pass failed"),
        }
    }
}
