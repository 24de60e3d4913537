//! Periodic timer abstraction
//!
//! The handler bound to the timer runs in interrupt context. It must not
//! block or touch any bus; the Lumen port only uses it to add elapsed
//! milliseconds to an atomic counter.

/// Hardware periodic timer
pub trait PeriodicTimer {
    /// Error type for timer operations
    type Error;

    /// Start firing every `period_ms` milliseconds
    fn start_periodic(&mut self, period_ms: u32) -> Result<(), Self::Error>;

    /// Stop firing and release the timer
    fn stop(&mut self) -> Result<(), Self::Error>;
}
