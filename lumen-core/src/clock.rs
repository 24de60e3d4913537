//! Logical clock for the graphics engine
//!
//! Two independent time sources exist. The periodic tick source runs an
//! interrupt-style handler that only calls [`LogicalClock::tick`]. The main
//! pump drains the accumulated time with [`LogicalClock::take_pending`] and
//! forwards it to the engine from its own single-threaded pass, so engine
//! state is never touched from the tick context.

use portable_atomic::{AtomicU32, Ordering};

/// Tick source period in milliseconds
pub const TICK_INTERVAL_MS: u32 = 10;

/// Main pump period in milliseconds
pub const PUMP_INTERVAL_MS: u32 = 50;

/// Monotonic millisecond counter fed from interrupt context
#[derive(Debug, Default)]
pub struct LogicalClock {
    /// Milliseconds ticked but not yet handed to the engine
    pending: AtomicU32,
    /// Milliseconds handed to the engine so far (wraps)
    consumed: AtomicU32,
}

impl LogicalClock {
    /// Create a clock at zero
    pub const fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
            consumed: AtomicU32::new(0),
        }
    }

    /// Record `delta_ms` of elapsed time
    ///
    /// Lock-free and non-blocking; safe to call from an interrupt handler.
    #[inline]
    pub fn tick(&self, delta_ms: u32) {
        self.pending.fetch_add(delta_ms, Ordering::Release);
    }

    /// Take all time recorded since the previous call
    pub fn take_pending(&self) -> u32 {
        let delta = self.pending.swap(0, Ordering::AcqRel);
        self.consumed.fetch_add(delta, Ordering::Relaxed);
        delta
    }

    /// Time recorded but not yet taken
    pub fn pending_ms(&self) -> u32 {
        self.pending.load(Ordering::Acquire)
    }

    /// Total time taken so far (wraps after ~49 days)
    pub fn elapsed_ms(&self) -> u32 {
        self.consumed.load(Ordering::Relaxed)
    }

    /// Return to zero
    pub fn reset(&self) {
        self.pending.store(0, Ordering::Release);
        self.consumed.store(0, Ordering::Relaxed);
    }
}
