//! Touch controller trait

use crate::touch::{ControllerInfo, TouchSample};

/// Trait for single-point touch controllers
///
/// A controller owns its bus session between `init` and `shutdown`. It
/// never keeps a reference to a returned sample.
pub trait TouchController {
    /// Bus or protocol error
    type Error;

    /// Open the bus session and identify the controller
    ///
    /// A failed identification read is not an error: implementations
    /// substitute [`ControllerInfo::fallback`] and carry on.
    fn init(&mut self) -> Result<ControllerInfo, Self::Error>;

    /// Take one sample
    fn read_sample(&mut self) -> Result<TouchSample, Self::Error>;

    /// Close the bus session
    fn shutdown(&mut self) -> Result<(), Self::Error>;

    /// Check if a bus session is open
    fn is_initialized(&self) -> bool;
}
